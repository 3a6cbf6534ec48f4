use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use dotenv::dotenv;
use kickoff_client::{
    BookingService, ClientConfig, Confirmation, HttpBackend, QuoteSource, SubmitRequest,
};
use kickoff_core::{Booking, BookingFilter, SportType, TimeRange, TurfFilter};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse turfs and manage bookings")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List turfs, optionally filtered
    Turfs {
        /// Matches name or location
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sport: Option<SportType>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
    },
    /// Show free windows of a turf on a date
    Slots { turf: String, date: NaiveDate },
    /// Price a slot
    Quote {
        turf: String,
        date: String,
        start: String,
        end: String,
    },
    /// Book a slot
    Book {
        turf: String,
        date: String,
        start: String,
        end: String,
        #[arg(long)]
        user: String,
    },
    /// List bookings of a user or a turf
    Bookings {
        #[arg(long, conflicts_with = "turf", required_unless_present = "turf")]
        user: Option<String>,
        #[arg(long)]
        turf: Option<String>,
        /// all, upcoming, today or cancelled
        #[arg(long, default_value = "all")]
        filter: BookingFilter,
    },
    /// Cancel a booking
    Cancel {
        booking: String,
        /// Required to actually cancel
        #[arg(long)]
        yes: bool,
    },
    /// Block a window on a turf
    Block {
        turf: String,
        date: String,
        start: String,
        end: String,
    },
    /// Remove a blocked window
    Unblock {
        slot: String,
        #[arg(long)]
        yes: bool,
    },
    /// List blocked windows of a turf, or of every turf an owner manages
    Blocked {
        #[arg(conflicts_with = "owner", required_unless_present = "owner")]
        turf: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
}

fn confirmation(yes: bool) -> Confirmation {
    if yes {
        Confirmation::Confirmed
    } else {
        Confirmation::Declined
    }
}

fn print_booking(booking: &Booking) {
    println!(
        "{}  turf {}  {} {}-{}  {:?}  {:.2}",
        booking.id,
        booking.resource_id,
        booking.date,
        booking.start.format("%H:%M"),
        booking.end.format("%H:%M"),
        booking.status,
        booking.total_price
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let args = Args::parse();
    let config = ClientConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Using booking backend at {}", config.api_url);
    let backend = Arc::new(HttpBackend::new(&config)?);
    let service = BookingService::new(backend, config.request_timeout);
    let now = Local::now().naive_local();

    match args.command {
        Command::Turfs {
            search,
            sport,
            location,
            min_price,
            max_price,
        } => {
            let filter = TurfFilter {
                search,
                sport_type: sport,
                location,
                min_price,
                max_price,
            };
            for turf in service.turfs(&filter).await? {
                println!(
                    "{}  {}  {}  {}  {:.2}/h  {}-{}",
                    turf.id,
                    turf.name,
                    turf.location,
                    turf.sport_type,
                    turf.price_per_hour,
                    turf.operating_start.format("%H:%M"),
                    turf.operating_end.format("%H:%M")
                );
            }
        }
        Command::Slots { turf, date } => {
            let windows = service.free_windows(&turf, date).await?;
            if windows.is_empty() {
                println!("No free slots on {date}");
            }
            for window in windows {
                println!("{window}");
            }
        }
        Command::Quote {
            turf,
            date,
            start,
            end,
        } => {
            let turf = service.turf(&turf).await?;
            let range = TimeRange::parse(&date, &start, &end)?;
            let quote = service.coordinator().quote(&turf, &range).await?;
            let note = match quote.source {
                QuoteSource::Backend => "",
                QuoteSource::Local => " (estimated)",
            };
            println!("{:.2}{}", quote.amount, note);
        }
        Command::Book {
            turf,
            date,
            start,
            end,
            user,
        } => {
            let turf = service.turf(&turf).await?;
            let request = SubmitRequest {
                turf,
                requester_id: user,
                date,
                start_time: start,
                end_time: end,
            };
            let booking = service
                .coordinator()
                .submit(request)
                .await
                .map_err(|err| {
                    let message = err.user_message();
                    Report::new(err).wrap_err(message)
                })?;
            println!("Booking confirmed");
            print_booking(&booking);
        }
        Command::Bookings { user, turf, filter } => {
            let bookings = match (user, turf) {
                (Some(user), _) => service.bookings_for_requester(&user, filter, now).await?,
                (None, Some(turf)) => service.bookings_for_turf(&turf, filter, now).await?,
                (None, None) => return Err(eyre!("Pass either --user or --turf")),
            };
            for booking in &bookings {
                print_booking(booking);
            }
        }
        Command::Cancel { booking, yes } => {
            match service.cancel_booking(&booking, confirmation(yes), now).await? {
                Some(cancelled) => print_booking(&cancelled),
                None => println!("Not cancelled. Re-run with --yes to cancel booking {booking}"),
            }
        }
        Command::Block {
            turf,
            date,
            start,
            end,
        } => {
            let blocked = service
                .block_interval(&turf, &date, &start, &end)
                .await
                .wrap_err("Failed to block slot")?;
            println!("Blocked slot {}", blocked.id);
        }
        Command::Unblock { slot, yes } => {
            if service.unblock_interval(&slot, confirmation(yes)).await? {
                println!("Unblocked slot {slot}");
            } else {
                println!("Not removed. Re-run with --yes to unblock slot {slot}");
            }
        }
        Command::Blocked { turf, owner } => {
            let slots = match (turf, owner) {
                (Some(turf), _) => service.blocked_intervals(&turf).await?,
                (None, Some(owner)) => service.blocked_intervals_for_owner(&owner).await?,
                (None, None) => return Err(eyre!("Pass either a turf id or --owner")),
            };
            for slot in slots {
                println!(
                    "{}  {}  {} {}-{}",
                    slot.id,
                    slot.turf_name.as_deref().unwrap_or(&slot.resource_id),
                    slot.date,
                    slot.start.format("%H:%M"),
                    slot.end.format("%H:%M")
                );
            }
        }
    }

    Ok(())
}
