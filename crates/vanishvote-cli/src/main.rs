use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use vanishvote_client::ApiClient;
use vanishvote_core::{
    share_url, FileVoteStore, MemoryVoteStore, Phase, PollForm, PollSession, RefreshTask, Theme,
    VoteFlags,
};

mod cli;
mod config;
mod render;

use cli::Command;

type Session = PollSession<ApiClient, VoteFlags>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    let default_filter = if args.verbose {
        "vanishvote=debug"
    } else {
        "vanishvote=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::Config::load(&args.config)?;
    config.apply_overrides(
        std::env::var(config::API_URL_ENV).ok(),
        args.api_url,
        args.theme,
    );
    let theme = config.ui.theme;

    // Sharing needs neither the network nor the vote store.
    if let Command::Share { poll_id } = &args.command {
        println!("{}", share_url(&config.share_base_url(), poll_id));
        return Ok(());
    }

    let api = ApiClient::new(&config.client_config())
        .with_context(|| format!("invalid API URL '{}'", config.api.base_url))?;
    let store = if args.no_store {
        VoteFlags::Memory(MemoryVoteStore::default())
    } else {
        VoteFlags::File(FileVoteStore::new(config.votes_path()))
    };

    match args.command {
        Command::Create {
            question,
            options,
            expires_in,
            hide_results,
            public,
        } => {
            let mut form = PollForm::with_options(question, options)?;
            form.expires_in = expires_in;
            form.hide_results = hide_results;
            form.is_private = !public;
            let poll = form.submit(&api).await?;
            let link = share_url(&config.share_base_url(), &poll.id);
            print!(
                "{}",
                render::Created {
                    poll: &poll,
                    share_url: &link,
                    theme,
                }
            );
        }
        Command::Show { poll_id, watch } => {
            let mut session = open(api, store, poll_id).await?;
            print_poll(&session, theme);
            if watch {
                watch_poll(&mut session, config.refresh_interval(), theme).await?;
            }
        }
        Command::Vote { poll_id, option } => {
            let mut session = open(api, store, poll_id).await?;
            let now = Utc::now();
            let option_count = session.view().poll().map_or(0, |p| p.options.len());
            let index = vote_index(session.view().phase(now), option, option_count)?;
            if !session.select(index, now) {
                bail!("No option {option} on this poll");
            }
            session.vote(now).await;
            finish(&session, theme)?;
        }
        Command::Comment { poll_id, text } => {
            if text.trim().is_empty() {
                bail!("Comment text is empty");
            }
            let mut session = open(api, store, poll_id).await?;
            session.comment(text).await;
            finish(&session, theme)?;
        }
        Command::React { poll_id, kind } => {
            let mut session = open(api, store, poll_id).await?;
            session.react(kind).await;
            finish(&session, theme)?;
        }
        Command::Share { .. } => {}
    }

    Ok(())
}

async fn open(api: ApiClient, store: VoteFlags, poll_id: String) -> Result<Session> {
    let session = PollSession::open(api, store, poll_id).await;
    if let Phase::Error(e) = session.view().phase(Utc::now()) {
        bail!("{e}");
    }
    Ok(session)
}

/// Map a 1-based option number from the command line to an option index,
/// refusing when this client can no longer vote.
fn vote_index(phase: Phase, option: usize, option_count: usize) -> Result<usize> {
    match phase {
        Phase::Votable => {}
        Phase::Expired => bail!("This poll has expired"),
        Phase::Voted => bail!("You have already voted on this poll"),
        Phase::Error(e) => bail!("{e}"),
        Phase::Loading => bail!("Poll has not loaded"),
    }
    if option == 0 || option > option_count {
        bail!("No option {option} on this poll");
    }
    Ok(option - 1)
}

fn print_poll(session: &Session, theme: Theme) {
    let screen = render::ViewScreen {
        view: session.view(),
        now: Utc::now(),
        theme,
    };
    print!("{screen}");
}

/// Print the poll, failing if the last action left a notice.
fn finish(session: &Session, theme: Theme) -> Result<()> {
    print_poll(session, theme);
    match session.view().notice() {
        Some(notice) => bail!("{notice}"),
        None => Ok(()),
    }
}

async fn watch_poll(session: &mut Session, period: std::time::Duration, theme: Theme) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = RefreshTask::spawn(session.api().clone(), session.poll_id(), period, tx);
    tracing::debug!(poll_id = session.poll_id(), ?period, "watching poll");

    loop {
        tokio::select! {
            action = rx.recv() => {
                let Some(action) = action else { break };
                session.apply(action);
                println!();
                print_poll(session, theme);
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("listening for Ctrl-C")?;
                break;
            }
        }
    }

    task.cancel();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanishvote_core::ViewError;

    #[test]
    fn option_numbers_are_one_based() {
        assert_eq!(vote_index(Phase::Votable, 1, 2).expect("first"), 0);
        assert_eq!(vote_index(Phase::Votable, 2, 2).expect("last"), 1);
        for bad in [0, 3] {
            let err = vote_index(Phase::Votable, bad, 2).expect_err("out of range");
            assert_eq!(err.to_string(), format!("No option {bad} on this poll"));
        }
    }

    #[test]
    fn closed_polls_refuse_votes() {
        let err = vote_index(Phase::Voted, 1, 2).expect_err("voted");
        assert_eq!(err.to_string(), "You have already voted on this poll");

        let err = vote_index(Phase::Expired, 1, 2).expect_err("expired");
        assert_eq!(err.to_string(), "This poll has expired");

        let err = vote_index(Phase::Error(ViewError::PollUnavailable), 1, 2).expect_err("error");
        assert_eq!(err.to_string(), "Poll not found or has expired");
    }
}
