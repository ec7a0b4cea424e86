use colored::Colorize;
use daylog_core::identity::Identity;
use daylog_infrastructure::AccountPicker;
use std::io::{self, BufRead, Write};

/// Asks on the terminal which configured account to sign in as.
///
/// Accepts a list number or a uid; an empty answer cancels.
#[derive(Debug, Default)]
pub struct StdinAccountPicker;

impl AccountPicker for StdinAccountPicker {
    fn pick(&self, accounts: &[Identity]) -> Option<Identity> {
        if let [only] = accounts {
            return Some(only.clone());
        }

        println!("{}", "Choose an account:".bright_yellow());
        for (i, account) in accounts.iter().enumerate() {
            println!(
                "  {} {} {}",
                format!("{}.", i + 1).bright_black(),
                account.display_name,
                format!("({})", account.uid).bright_black()
            );
        }
        print!("{}", "account> ".bright_yellow());
        io::stdout().flush().ok()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer).ok()?;
        choose(accounts, answer.trim())
    }
}

fn choose(accounts: &[Identity], answer: &str) -> Option<Identity> {
    if answer.is_empty() {
        return None;
    }
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| accounts.get(i)).cloned();
    }
    accounts.iter().find(|a| a.uid == answer).cloned()
}
