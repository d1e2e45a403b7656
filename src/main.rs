use anyhow::Context;
use clap::Parser;
use lendbook::config::cli::{Cli, Command};
use lendbook::config::Settings;
use lendbook::utils::{logger, validation::Validate};
use lendbook::{Decision, LibraryEngine, LibraryState, ReturnOutcome, SearchFilter};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    // Settings file fills in whatever the command line left at its default.
    if let Some(config_path) = cli.config.clone() {
        let settings = Settings::load(Path::new(&config_path))
            .with_context(|| format!("failed to load settings from {config_path}"))?;
        if let Some(state) = settings.state {
            if cli.state == "library.json" {
                cli.state = state;
            }
        }
        if let Some(verbose) = settings.verbose {
            cli.verbose = cli.verbose || verbose;
        }
    }

    logger::init_cli_logger(cli.verbose);
    cli.validate().context("invalid configuration")?;

    tracing::debug!(state = %cli.state, "loading library state");
    let state_path = Path::new(&cli.state).to_path_buf();
    let state = LibraryState::load_or_default(&state_path)?;
    let (books, members) = state.into_stores()?;
    let engine = LibraryEngine::new(books.clone(), members.clone());

    let ok = run(&engine, &cli.command)?;

    LibraryState::from_stores(&books, &members)?.save(&state_path)?;
    tracing::debug!(state = %state_path.display(), "library state saved");

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn report(decision: Decision) -> bool {
    match decision {
        Decision::Approved => {
            println!("ok");
            true
        }
        Decision::Denied(reason) => {
            eprintln!("denied: {}", reason.code());
            false
        }
    }
}

fn run(
    engine: &LibraryEngine<lendbook::InMemoryBookStore, lendbook::InMemoryMemberStore>,
    command: &Command,
) -> anyhow::Result<bool> {
    let ok = match command {
        Command::AddBook { id, title } => report(engine.create_book(id, title)?),
        Command::UpdateBook { id, title } => report(engine.update_book(id, title)?),
        Command::DeleteBook { id } => report(engine.delete_book(id)?),
        Command::AddMember { id, name } => report(engine.create_member(id, name)?),
        Command::UpdateMember { id, name } => report(engine.update_member(id, name)?),
        Command::DeleteMember { id } => report(engine.delete_member(id)?),
        Command::Borrow { book, member } => report(engine.borrow_book(book, member)?),
        Command::Return { book, member } => match engine.return_book(book, member)? {
            ReturnOutcome::Accepted { next_holder } => {
                match next_holder {
                    Some(next) => println!("returned; handed off to {next}"),
                    None => println!("returned"),
                }
                true
            }
            ReturnOutcome::Rejected => {
                eprintln!("denied: book is not on loan to that member");
                false
            }
        },
        Command::Reserve { book, member } => report(engine.reserve_book(book, member)?),
        Command::Cancel { book, member } => report(engine.cancel_reservation(book, member)?),
        Command::Extend { book, days } => report(engine.extend_loan(book, *days)?),
        Command::Search {
            title,
            available,
            member,
        } => {
            let filter = SearchFilter {
                title_contains: title.clone(),
                available_only: *available,
                loaned_to: member.clone(),
            };
            let books = engine.search_books(&filter)?;
            println!("{}", serde_json::to_string_pretty(&books)?);
            true
        }
        Command::Overdue { as_of } => {
            let cutoff = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
            let books = engine.overdue_books(cutoff)?;
            println!("{}", serde_json::to_string_pretty(&books)?);
            true
        }
        Command::Summary { member } => match engine.member_summary(member)? {
            Some(summary) => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                true
            }
            None => {
                eprintln!("denied: MEMBER_NOT_FOUND");
                false
            }
        },
        Command::Books => {
            println!("{}", serde_json::to_string_pretty(&engine.all_books()?)?);
            true
        }
        Command::Members => {
            println!("{}", serde_json::to_string_pretty(&engine.all_members()?)?);
            true
        }
    };
    Ok(ok)
}
