use crate::command_decrypt::print_ballot;
use crate::config::SimulateConfig;
use cryptovote::*;
use tracing::{debug, info, warn};

pub fn command_simulate(matches: &clap::ArgMatches) {
    let config = SimulateConfig::from_matches(matches).unwrap_or_else(|e| {
        eprintln!("cryptovote simulate: {}", e);
        std::process::exit(1);
    });
    let params = config.params;

    let mut rng = crate::rng(config.seed);

    info!(
        "Generating Paillier keys (Size: {} bits) and {:?} key...",
        params.key_bits, config.cipher
    );
    let simulation = Simulation::setup(params, config.cipher, config.padding, &mut rng)
        .unwrap_or_else(|e| {
            eprintln!("cryptovote simulate: unable to set up election: {}", e);
            std::process::exit(1);
        });
    debug!("Vote weights: {}", simulation.weights());

    info!(
        "Simulating, encrypting and tallying {} votes (using M = {})...",
        params.num_votes,
        simulation.weights().base()
    );
    let outcome = simulation.run(&mut rng).unwrap_or_else(|e| {
        eprintln!("cryptovote simulate: {}", e);
        std::process::exit(1);
    });
    info!("{} votes processed, encrypted and tallied.", outcome.ballots.len());

    print_report(&outcome);

    if let Some(path) = &config.output {
        write_file(path, outcome.record().to_bytes(config.format));
        info!("Election record written to {}", path);
    }
    if let Some(path) = &config.secrets {
        write_file(path, outcome.secrets().to_bytes(config.format));
        info!("Election secrets written to {}", path);
    }

    for &index in &config.open {
        match outcome.decrypt_ballot(index) {
            Ok(ballot) => print_ballot(index, &ballot),
            Err(e) => eprintln!("cryptovote simulate: unable to decrypt ballot {}: {}", index, e),
        }
    }

    if !outcome.verification.passed {
        std::process::exit(2);
    }
}

fn print_report(outcome: &SimulationOutcome) {
    let verification = &outcome.verification;

    println!("--- Simulation Results ---");
    println!(" Decrypted total sum: {}", outcome.result.total);
    for check in &verification.candidates {
        if check.passed() {
            println!(
                " Candidate {}: {} votes (Verification: Passed)",
                check.candidate, check.decoded
            );
        } else {
            println!(
                " Candidate {}: {} votes (Verification: FAIL! Expected {})",
                check.candidate, check.decoded, check.expected
            );
        }
    }
    println!(" Total votes decoded: {}", verification.total_decoded);

    if verification.total_mismatch {
        warn!(
            "Total decoded votes ({}) does not match number of simulated votes ({})!",
            verification.total_decoded, verification.num_ballots
        );
    }

    let leaders = outcome.result.leaders();
    if !leaders.is_empty() {
        let leaders: Vec<String> = leaders.iter().map(|c| c.to_string()).collect();
        println!(" Leading candidate(s): {}", leaders.join(", "));
    }

    if verification.passed {
        println!("\n SUCCESS: Paillier tally simulation verified.");
    } else {
        println!("\n FAILED: Discrepancy found in Paillier tally simulation.");
    }
}

fn write_file(path: &str, bytes: Result<Vec<u8>, Error>) {
    let bytes = bytes.unwrap_or_else(|e| {
        eprintln!("cryptovote simulate: unable to encode {}: {}", path, e);
        std::process::exit(1);
    });
    if let Err(e) = std::fs::write(path, bytes) {
        eprintln!("cryptovote simulate: unable to write {}: {}", path, e);
        std::process::exit(1);
    }
}
