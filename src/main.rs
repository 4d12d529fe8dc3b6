use clap::Parser;
use letter_scout::store::LetterStore;
use letter_scout::{FetchOutcome, Scout, ScoutConfig};
use std::error::Error;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ScoutConfig::from_file(path)?,
        None => ScoutConfig::default(),
    }
    .apply_env_overrides();

    let mut scout = Scout::new(config);
    if let Some(store) = args.store {
        scout = scout.with_store_path(store);
    }
    if let Some(timeout) = args.timeout {
        scout = scout.with_timeout(timeout);
    }

    ::log::info!("Listing root: {}", scout.config().base_url);
    let mut discovery = scout.build()?;

    match args.command {
        Command::FetchNew => {
            let outcome = discovery.run_fetch_new().await.inspect_err(|e| {
                ::log::error!("Error fetching new letters: {}", e);
            })?;
            report(&outcome);
        }
        Command::FetchMore { page } => {
            let outcome = discovery.run_fetch_more(page).await.inspect_err(|e| {
                ::log::error!("Error fetching more letters: {}", e);
            })?;
            report(&outcome);
        }
        Command::List { limit, offset } => {
            let store = discovery.store();
            let letters = store.list_letters(limit, offset)?;
            let total = store.count()?;
            for letter in &letters {
                println!("{:>5}  {:<10}  {}", letter.id, letter.period, letter.title);
            }
            if offset + letters.len() < total {
                println!("... {} of {} letters shown", letters.len(), total);
            }
        }
        Command::Show { id } => {
            let store = discovery.store();
            let Some(letter) = store.get_letter(id)? else {
                ::log::error!("Letter {} not found", id);
                return Err(format!("letter {id} not found").into());
            };
            println!("{}\n{}\n{}\n", letter.title, letter.locator, letter.period);
            println!("{}", letter.body);
            for question in store.questions_for(id)? {
                println!("\nQ: {}\nA: {}", question.question, question.answer);
            }
        }
    }

    Ok(())
}

fn report(outcome: &FetchOutcome) {
    println!("{}", outcome.message);
    for letter in &outcome.new_letters {
        println!("  + {}  {}", letter.period, letter.title);
    }
    ::log::debug!("Pages visited: {:?}", outcome.pages_visited);
}
