use cryptovote::*;

pub fn command_decrypt(matches: &clap::ArgMatches) {
    let record = read_file(matches.value_of("record"), "record", SimulationRecord::from_bytes);
    let secrets = read_file(matches.value_of("secrets"), "secrets", SimulationSecrets::from_bytes);

    let index = match matches.value_of("index").map(str::parse::<usize>) {
        Some(Ok(index)) => index,
        _ => {
            eprintln!("cryptovote decrypt: a valid ballot index is required");
            std::process::exit(1);
        }
    };

    let ballot = record.decrypt_ballot(index, &secrets).unwrap_or_else(|e| {
        eprintln!("cryptovote decrypt: {}", e);
        std::process::exit(1);
    });

    print_ballot(index, &ballot);
}

pub fn print_ballot(index: usize, ballot: &DecryptedBallot) {
    println!("\n--- Decrypting Ballot #{} ---", index);
    println!(" Decrypted PII: \"{}\"", ballot.pii);
    println!(" Decrypted Plaintext Vote Weight (M^i): {}", ballot.weight);
    match ballot.candidate {
        Some(candidate) => println!(" Vote for candidate: {}", candidate),
        None => println!(" Vote weight does not match any candidate"),
    }
    println!("------------------------------");
}

fn read_file<T, F>(filename: Option<&str>, what: &str, parse: F) -> T
where
    F: Fn(&[u8]) -> Result<T, Error>,
{
    let filename = match filename {
        Some(filename) => crate::expand(filename),
        None => {
            eprintln!("cryptovote decrypt: {} filename required", what);
            std::process::exit(1);
        }
    };

    let file_bytes = match std::fs::read(&filename) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("cryptovote decrypt: unable to read {}: {}", filename, e);
            std::process::exit(1);
        }
    };

    parse(&file_bytes).unwrap_or_else(|e| {
        eprintln!("cryptovote decrypt: unable to read {}: {}", filename, e);
        std::process::exit(1);
    })
}
