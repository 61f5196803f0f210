//! CLI wrapper around the taper engine
//!
//! Prints the four artifact sections to stdout; exits non-zero with the
//! error message on validation failure.

use chrono::{Local, NaiveDate};
use clap::Parser;

use tapergen::models::{DosingFrequency, FinalHold, Medication, TaperRequest, TaperSpeed};
use tapergen::reports;
use tapergen::schedule::generate_plan;

#[derive(Parser, Debug)]
#[command(name = "generate_taper", about = "Generate a benzodiazepine taper schedule")]
struct Args {
    /// Starting medication (e.g. clonazepam)
    #[arg(long)]
    med: String,

    /// Starting dose in mg
    #[arg(long)]
    dose: f64,

    /// Taper speed: slow, standard, fast, very_fast, ultra_fast
    #[arg(long, default_value = "standard")]
    speed: String,

    /// Start date YYYY-MM-DD (defaults to today)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Dosing frequency: once, bid, tid
    #[arg(long, default_value = "once", value_parser = parse_frequency)]
    freq: DosingFrequency,

    /// Final hold: total DAYS, then one dose every EVERY_N days
    #[arg(long, num_args = 2, value_names = ["DAYS", "EVERY_N"])]
    final_hold: Option<Vec<u32>>,
}

fn parse_frequency(s: &str) -> Result<DosingFrequency, String> {
    DosingFrequency::parse(s)
        .ok_or_else(|| format!("'{}' is not a dosing frequency (choices: once, bid, tid)", s))
}

fn run(args: Args) -> tapergen::TaperResult<()> {
    let request = TaperRequest {
        medication: Medication::parse(&args.med)?,
        starting_dose_mg: args.dose,
        speed: TaperSpeed::parse(&args.speed)?,
        start_date: args.start.unwrap_or_else(|| Local::now().date_naive()),
        available_strengths: tapergen::equivalence::reference_strengths().to_vec(),
        frequency: args.freq,
        final_hold: args.final_hold.map(|fh| FinalHold {
            total_days: fh[0],
            every_n_days: fh[1],
            dose_mg: None,
        }),
    };

    let plan = generate_plan(&request)?;
    let response = reports::build_response(&request, &plan);

    if let Some(warn) = &response.warn {
        eprintln!("Warning: {}\n", warn);
    }

    println!("PATIENT INSTRUCTIONS");
    println!("--------------------");
    for line in &response.patient_instructions {
        println!("{}", line);
    }

    println!("\nEHR SUMMARY");
    println!("-----------");
    println!("{}", response.ehr_summary);

    println!("\nPHARMACY ORDERS");
    println!("---------------");
    for order in &response.pharmacy_orders {
        println!("{}", order.date);
        println!("  {}", order.product);
        println!("  {}", order.sig);
        println!("  {}\n", order.dispense);
    }

    println!("TOTAL PILLS NEEDED");
    println!("------------------");
    for (strength, count) in &response.pill_totals {
        println!("Diazepam {} mg: {} tablets", strength, count);
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
