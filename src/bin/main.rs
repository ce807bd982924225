// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use vending_demo_rs::{Catalog, Coin, MachineConfig, VendingError, VendingMachine, load_config};

/// Vending Machine - Drive a simulated vending machine
///
/// Reads machine events from a CSV file and prints every panel message to
/// stdout. Without an events file, runs a short demonstration purchase.
#[derive(Parser, Debug)]
#[command(name = "vending-demo-rs")]
#[command(about = "A vending machine controller driven by CSV event scripts", long_about = None)]
struct Args {
    /// Machine configuration (TOML). Defaults to the built-in configuration.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to CSV file with machine events
    ///
    /// Expected format: action,weight,diameter,product
    /// Example: cargo run -- events.csv
    #[arg(value_name = "FILE")]
    events: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            "warn".parse().unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::WARN.into()),
        ))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path),
        None => MachineConfig::default_config(),
    };
    let (mut machine, catalog) = match config.and_then(|config| config.build()) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let mut stdout = std::io::stdout();
    if let Err(e) = writeln!(stdout, "{}", machine.current_message()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }

    let result = match &args.events {
        Some(path) => {
            let file = match File::open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Error opening file '{}': {}", path.display(), e);
                    process::exit(1);
                }
            };
            process_events(&mut machine, &catalog, BufReader::new(file), &mut stdout)
        }
        None => run_demo(&mut machine, &catalog, &mut stdout),
    };

    if let Err(e) = result {
        eprintln!("Error processing events: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the event format.
///
/// Fields: `action, weight, diameter, product`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    action: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    weight: Option<Decimal>,
    #[serde(deserialize_with = "csv::invalid_option")]
    diameter: Option<Decimal>,
    #[serde(default)]
    product: Option<String>,
}

/// A machine event parsed from one CSV row.
#[derive(Debug, Clone, PartialEq)]
enum Event {
    InsertCoin(Coin),
    SelectProduct(String),
    ReturnCoins,
}

impl CsvRecord {
    /// Converts a CSV record to an event.
    ///
    /// Returns `None` for unknown actions or missing required fields.
    fn into_event(self) -> Option<Event> {
        match self.action.to_lowercase().as_str() {
            "insert" => {
                let coin = Coin::new(self.weight?, self.diameter?).ok()?;
                Some(Event::InsertCoin(coin))
            }
            "select" => {
                let name = self.product.filter(|name| !name.trim().is_empty())?;
                Some(Event::SelectProduct(name))
            }
            "return" => Some(Event::ReturnCoins),
            _ => None,
        }
    }
}

/// Errors that stop event processing.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Process machine events from a CSV reader.
///
/// Rows are streamed one at a time. Malformed rows, unknown actions, unknown
/// products and machine errors are reported on stderr and skipped.
///
/// # CSV Format
///
/// Expected columns: `action, weight, diameter, product`
/// - `action`: `insert`, `select` or `return`
/// - `weight`, `diameter`: coin measurements in grams and millimetres (insert only)
/// - `product`: product name from the catalog (select only)
///
/// # Example
///
/// ```csv
/// action,weight,diameter,product
/// insert,5.670,24.26,
/// select,,,Cola
/// return,,,
/// ```
///
/// # Errors
///
/// Returns an error if the reader fails or output cannot be written.
fn process_events<R: Read, W: Write>(
    machine: &mut VendingMachine,
    catalog: &Catalog,
    reader: R,
    mut out: W,
) -> Result<(), RunError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping malformed row: {e}");
                continue;
            }
        };
        let Some(event) = record.into_event() else {
            warn!("skipping invalid event record");
            continue;
        };

        match apply_event(machine, catalog, &event) {
            Ok(messages) => write_messages(&mut out, &messages)?,
            Err(e) => warn!(?event, "skipping event: {e}"),
        }
    }

    out.flush()?;
    Ok(())
}

fn apply_event(
    machine: &mut VendingMachine,
    catalog: &Catalog,
    event: &Event,
) -> Result<Vec<String>, VendingError> {
    match event {
        Event::InsertCoin(coin) => machine.insert_coin(coin),
        Event::SelectProduct(name) => match catalog.find(name) {
            Some(product) => machine.select_product(product),
            None => {
                warn!(product = %name, "product not in catalog");
                Ok(Vec::new())
            }
        },
        Event::ReturnCoins => machine.return_coins(),
    }
}

/// Insert a quarter, pick a cola, then feed three more quarters.
fn run_demo<W: Write>(
    machine: &mut VendingMachine,
    catalog: &Catalog,
    mut out: W,
) -> Result<(), RunError> {
    let quarter = Coin::new(dec!(5.670), dec!(24.26)).ok();
    let events = quarter
        .into_iter()
        .map(Event::InsertCoin)
        .chain([Event::SelectProduct("Cola".to_owned())])
        .chain(quarter.into_iter().cycle().take(3).map(Event::InsertCoin));

    writeln!(out, "---- Vending Machine Simulation ----")?;
    for event in events {
        match apply_event(machine, catalog, &event) {
            Ok(messages) => write_messages(&mut out, &messages)?,
            Err(e) => warn!(?event, "demo event failed: {e}"),
        }
    }
    out.flush()?;
    Ok(())
}

fn write_messages<W: Write>(out: &mut W, messages: &[String]) -> std::io::Result<()> {
    for message in messages {
        writeln!(out, "{message}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use vending_demo_rs::State;

    fn default_machine() -> (VendingMachine, Catalog) {
        MachineConfig::default_config().unwrap().build().unwrap()
    }

    fn run(csv: &str) -> (VendingMachine, Catalog, String) {
        let (mut machine, catalog) = default_machine();
        let mut output = Vec::new();
        process_events(&mut machine, &catalog, Cursor::new(csv), &mut output).unwrap();
        (machine, catalog, String::from_utf8(output).unwrap())
    }

    #[test]
    fn parse_insert_event() {
        let (machine, _, output) = run("action,weight,diameter,product\ninsert,5.670,24.26,\n");
        assert_eq!(output, "BALANCE: $0.25\nSELECT PRODUCT\n");
        assert_eq!(machine.state(), State::HasCoin);
    }

    #[test]
    fn parse_full_purchase() {
        let csv = "action,weight,diameter,product\n\
                   insert,5.670,24.26,\n\
                   insert,5.670,24.26,\n\
                   select,,,Chips\n\
                   insert,2.268,17.91,\n";
        let (machine, catalog, output) = run(csv);

        assert!(output.contains("DISPENSING Chips...\nChips DISPENSED\nTHANK YOU\n"));
        assert!(output.ends_with("RETURNING COIN...\nINSERT COIN\n"));
        assert_eq!(machine.state(), State::NoCoin);
        let chips = catalog.find("Chips").unwrap();
        assert_eq!(machine.inventory().quantity(chips), 2);
    }

    #[test]
    fn parse_with_whitespace_and_case() {
        let (machine, _, _) = run("action,weight,diameter,product\n INSERT , 5.670 , 24.26 , \n");
        assert_eq!(machine.state(), State::HasCoin);
    }

    #[test]
    fn return_event_refunds() {
        let csv = "action,weight,diameter,product\n\
                   insert,5.000,21.21,\n\
                   return,,,\n";
        let (machine, _, output) = run(csv);
        assert!(output.contains("COIN(S) RETURNED\n"));
        assert_eq!(machine.balance(), vending_demo_rs::Price::ZERO);
    }

    #[test]
    fn skip_malformed_rows() {
        let csv = "action,weight,diameter,product\n\
                   insert,heavy,24.26,\n\
                   insert,0,24.26,\n\
                   dance,,,\n\
                   select,,,\n\
                   insert,5.670,24.26,\n";
        let (machine, _, output) = run(csv);
        assert_eq!(output, "BALANCE: $0.25\nSELECT PRODUCT\n");
        assert_eq!(machine.state(), State::HasCoin);
    }

    #[test]
    fn unknown_product_is_skipped() {
        let csv = "action,weight,diameter,product\n\
                   insert,5.670,24.26,\n\
                   select,,,Gum\n";
        let (machine, _, output) = run(csv);
        assert_eq!(output, "BALANCE: $0.25\nSELECT PRODUCT\n");
        assert!(machine.selected_product().is_empty());
    }

    #[test]
    fn demo_dispenses_cola() {
        let (mut machine, catalog) = default_machine();
        let mut output = Vec::new();
        run_demo(&mut machine, &catalog, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("---- Vending Machine Simulation ----\n"));
        assert!(output.contains("DISPENSING Cola...\nCola DISPENSED\nTHANK YOU\n"));
        let cola = catalog.find("Cola").unwrap();
        assert_eq!(machine.inventory().quantity(cola), 4);
        assert_eq!(machine.state(), State::NoCoin);
    }
}
