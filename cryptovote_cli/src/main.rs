use clap::{App, Arg, ArgMatches, SubCommand};
use num_enum::TryFromPrimitive;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod command_decrypt;
mod command_keygen;
mod command_simulate;
mod config;

use command_decrypt::*;
use command_keygen::*;
use command_simulate::*;

#[derive(TryFromPrimitive, PartialEq, Copy, Clone, Debug)]
#[repr(u8)]
enum Verbosity {
    Warn = 0,
    Info = 1,
    Debug = 2,
}

impl Verbosity {
    fn level(self) -> Level {
        match self {
            Verbosity::Warn => Level::WARN,
            Verbosity::Info => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
        }
    }
}

fn main() {
    let matches = app().get_matches();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(verbosity(&matches).level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("cryptovote: unable to install logger: {}", e);
    }

    // Subcommands
    if let Some(matches) = matches.subcommand_matches("simulate") {
        command_simulate(matches);
        std::process::exit(0);
    }

    if let Some(matches) = matches.subcommand_matches("decrypt") {
        command_decrypt(matches);
        std::process::exit(0);
    }

    if let Some(matches) = matches.subcommand_matches("keygen") {
        command_keygen(matches);
        std::process::exit(0);
    }

    eprintln!("cryptovote: a subcommand is required (simulate, decrypt or keygen), see --help");
    std::process::exit(1);
}

fn app() -> App<'static, 'static> {
    App::new("CryptoVote CLI")
        .version("0.1")
        .author("Patrick Hayes <patrick.d.hayes@gmail.com>")
        .about("Simulates a Paillier-tallied election with AES or DES protected voter data")
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            SubCommand::with_name("simulate")
                .about("Simulate, tally and verify an election")
                .arg(
                    Arg::with_name("candidates")
                        .long("candidates")
                        .takes_value(true)
                        .help("Number of candidates - can also be set with CRYPTOVOTE_CANDIDATES"),
                )
                .arg(
                    Arg::with_name("max-voters")
                        .long("max-voters")
                        .takes_value(true)
                        .help(
                            "Maximum expected number of voters k, giving base M = k + 1 - can also be set with CRYPTOVOTE_MAX_VOTERS",
                        ),
                )
                .arg(
                    Arg::with_name("votes")
                        .long("votes")
                        .takes_value(true)
                        .help("Number of votes to simulate - can also be set with CRYPTOVOTE_VOTES"),
                )
                .arg(
                    Arg::with_name("key-bits")
                        .long("key-bits")
                        .takes_value(true)
                        .help("Paillier modulus size in bits (default 1024) - can also be set with CRYPTOVOTE_KEY_BITS"),
                )
                .arg(
                    Arg::with_name("cipher")
                        .long("cipher")
                        .takes_value(true)
                        .possible_values(&["aes", "des"])
                        .help("Cipher protecting voter PII (default aes) - can also be set with CRYPTOVOTE_CIPHER"),
                )
                .arg(
                    Arg::with_name("padding")
                        .long("padding")
                        .takes_value(true)
                        .possible_values(&["pkcs7", "zero"])
                        .help("CBC padding (default pkcs7) - can also be set with CRYPTOVOTE_PADDING"),
                )
                .arg(
                    Arg::with_name("seed")
                        .long("seed")
                        .takes_value(true)
                        .help("Seed the random generator for a reproducible run - can also be set with CRYPTOVOTE_SEED"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("Write the public election record to this file"),
                )
                .arg(
                    Arg::with_name("secrets")
                        .long("secrets")
                        .takes_value(true)
                        .help("Write the election secrets (symmetric and Paillier private keys) to this file"),
                )
                .arg(
                    Arg::with_name("format")
                        .long("format")
                        .takes_value(true)
                        .possible_values(&["json", "cbor"])
                        .default_value("json")
                        .help("Encoding of the written files"),
                )
                .arg(
                    Arg::with_name("open")
                        .long("open")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .help("Decrypt the ballot at this index after tallying"),
                ),
        )
        .subcommand(
            SubCommand::with_name("decrypt")
                .about("Decrypt a single ballot from an election record")
                .arg(
                    Arg::with_name("record")
                        .long("record")
                        .takes_value(true)
                        .required(true)
                        .help("Election record in JSON or CBOR format"),
                )
                .arg(
                    Arg::with_name("secrets")
                        .long("secrets")
                        .takes_value(true)
                        .required(true)
                        .help("Election secrets in JSON or CBOR format"),
                )
                .arg(
                    Arg::with_name("index")
                        .long("index")
                        .takes_value(true)
                        .required(true)
                        .help("Index of the ballot to decrypt"),
                ),
        )
        .subcommand(
            SubCommand::with_name("keygen")
                .about("Generate a symmetric key, and optionally a Paillier keypair")
                .arg(
                    Arg::with_name("cipher")
                        .long("cipher")
                        .takes_value(true)
                        .possible_values(&["aes", "des"])
                        .default_value("aes"),
                )
                .arg(
                    Arg::with_name("paillier-bits")
                        .long("paillier-bits")
                        .takes_value(true)
                        .help("Also generate a Paillier keypair with a modulus of this size"),
                )
                .arg(
                    Arg::with_name("seed")
                        .long("seed")
                        .takes_value(true)
                        .help("Seed the random generator - can also be set with CRYPTOVOTE_SEED"),
                ),
        )
}

// A global arg's count is copied into the subcommand's matches, wherever -v was given
fn verbosity(matches: &ArgMatches) -> Verbosity {
    let occurrences = match matches.subcommand() {
        (_, Some(sub_matches)) => sub_matches.occurrences_of("v"),
        _ => matches.occurrences_of("v"),
    };
    let occurrences = std::cmp::min(occurrences, 2) as u8;
    Verbosity::try_from_primitive(occurrences).unwrap_or(Verbosity::Debug)
}

/// Shell-expand a path given on the command line (`~`, `$VAR`)
pub fn expand(filename: &str) -> String {
    match shellexpand::full(filename) {
        Ok(expanded) => expanded.into_owned(),
        Err(e) => {
            eprintln!("cryptovote: unable to expand {}: {}", filename, e);
            std::process::exit(1);
        }
    }
}

/// The run's single random generator, seeded from the OS unless a seed is given
pub fn rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbosity_of(args: &[&str]) -> Verbosity {
        verbosity(&app().get_matches_from(args.to_vec()))
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(verbosity_of(&["cryptovote", "simulate"]), Verbosity::Warn);
        assert_eq!(verbosity_of(&["cryptovote", "simulate", "-v"]), Verbosity::Info);
        assert_eq!(verbosity_of(&["cryptovote", "-v", "simulate"]), Verbosity::Info);
        assert_eq!(verbosity_of(&["cryptovote", "simulate", "-vv"]), Verbosity::Debug);
        assert_eq!(verbosity_of(&["cryptovote", "-vv", "keygen"]), Verbosity::Debug);
        assert_eq!(verbosity_of(&["cryptovote", "simulate", "-vvvv"]), Verbosity::Debug);
        assert_eq!(verbosity_of(&["cryptovote", "-v"]), Verbosity::Info);
    }
}
