// Interactive console for the member directory.
//
// Drives the directory_core library by hand: register accounts, log in,
// refresh access codes. Issued codes are "delivered" to the terminal, which
// plays the part of the phone.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use directory_core::{Directory, Notifier};

#[derive(Parser)]
#[command(name = "dev", about = "Exercise the member directory from a terminal")]
struct Cli {
    /// Register a pair of demo accounts before the prompt loop
    #[arg(long)]
    seed: bool,
}

/// Prints deliveries to the terminal, standing in for a real SMS gateway.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn send(&self, destination: &str, code: &str) -> Result<()> {
        println!(
            "{} {} {} {}",
            "📨 access code".bright_yellow(),
            code.bright_yellow().bold(),
            "sent to".bright_yellow(),
            destination.bright_yellow()
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,directory_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let term = Term::stdout();
    print_banner(&term)?;

    let directory = Directory::new(Arc::new(TerminalNotifier));
    if cli.seed {
        seed_demo(&directory)?;
    }

    // Main interactive loop
    loop {
        println!();
        let options = vec![
            "✉️  Register by email",
            "📱 Register by phone",
            "🔑 Log in",
            "🔄 Request a new access code",
            "🔒 Change password",
            "📋 Directory status",
            "🛑 Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact_on(&term)?;

        match selection {
            0 => register_by_email(&directory)?,
            1 => register_by_phone(&directory)?,
            2 => log_in(&directory)?,
            3 => request_access_code(&directory)?,
            4 => change_password(&directory)?,
            5 => status(&directory),
            6 => {
                println!("{}", "👋 Goodbye!".bright_blue());
                break;
            }
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn print_banner(term: &Term) -> Result<()> {
    term.clear_screen()?;
    println!(
        "{}",
        "╔════════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{}",
        "║   Common Room Directory Console        ║".bright_cyan()
    );
    println!(
        "{}",
        "╚════════════════════════════════════════╝".bright_cyan()
    );
    println!();
    Ok(())
}

fn register_by_email(directory: &Directory) -> Result<()> {
    let full_name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Full name (first last)")
        .interact_text()?;
    let email: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Email")
        .interact_text()?;
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;

    match directory.register_by_email(&full_name, &email, &password) {
        Ok(account) => {
            println!("{}", "✅ Registered!".bright_green().bold());
            println!("{}", account.user_info().dimmed());
        }
        Err(error) => println!("{} {}", "❌ Registration failed:".bright_red(), error),
    }
    Ok(())
}

fn register_by_phone(directory: &Directory) -> Result<()> {
    let full_name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Full name (first last)")
        .interact_text()?;
    let phone: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Phone number")
        .interact_text()?;

    match directory.register_by_phone(&full_name, &phone) {
        Ok(account) => {
            println!("{}", "✅ Registered!".bright_green().bold());
            println!("{}", account.user_info().dimmed());
        }
        Err(error) => println!("{} {}", "❌ Registration failed:".bright_red(), error),
    }
    Ok(())
}

fn log_in(directory: &Directory) -> Result<()> {
    let identifier: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Login (email or phone)")
        .interact_text()?;
    let credential = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password or access code")
        .interact()?;

    match directory.login(&identifier, &credential) {
        Some(info) => {
            println!("{}", "✅ Welcome back!".bright_green().bold());
            println!("{}", info.dimmed());
        }
        None => println!(
            "{}",
            "❌ No account matches those credentials.".bright_red()
        ),
    }
    Ok(())
}

fn request_access_code(directory: &Directory) -> Result<()> {
    let phone: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Phone number")
        .interact_text()?;

    match directory.request_access_code(&phone) {
        Some(_) => println!("{}", "✅ A fresh access code is on its way.".bright_green()),
        None => println!("{}", "❌ That phone number is not registered.".bright_red()),
    }
    Ok(())
}

fn change_password(directory: &Directory) -> Result<()> {
    let identifier: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Login (email or phone)")
        .interact_text()?;
    let old = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Current password or access code")
        .interact()?;
    let new = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("New password")
        .with_confirmation("Confirm new password", "Passwords do not match")
        .interact()?;

    match directory.change_password(&identifier, &old, &new) {
        Ok(()) => println!("{}", "✅ Password changed.".bright_green().bold()),
        Err(error) => println!("{} {}", "❌ Change failed:".bright_red(), error),
    }
    Ok(())
}

fn status(directory: &Directory) {
    if directory.is_empty() {
        println!("{}", "No accounts registered yet.".dimmed());
    } else {
        println!(
            "{} {}",
            directory.len().to_string().bright_green().bold(),
            "account(s) registered"
        );
    }
}

fn seed_demo(directory: &Directory) -> Result<()> {
    directory
        .register_by_email("John Doe", "john_doe@unknown.com", "testPass")
        .context("failed to seed the demo email account")?;
    directory
        .register_by_phone("Jane Doe", "+7 (917) 971 11-11")
        .context("failed to seed the demo phone account")?;

    println!(
        "{}",
        "Seeded john_doe@unknown.com (password: testPass) and +79179711111".dimmed()
    );
    Ok(())
}
