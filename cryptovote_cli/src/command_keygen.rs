use crate::config::{setting, ENV_SEED};
use cryptovote::*;
use tracing::info;

pub fn command_keygen(matches: &clap::ArgMatches) {
    let kind: CipherKind = matches
        .value_of("cipher")
        .unwrap_or("aes")
        .parse()
        .unwrap_or_else(|e| {
            eprintln!("cryptovote keygen: {}", e);
            std::process::exit(1);
        });
    let seed: Option<u64> = setting(matches, "seed", ENV_SEED).unwrap_or_else(|e| {
        eprintln!("cryptovote keygen: {}", e);
        std::process::exit(1);
    });
    let paillier_bits = match matches.value_of("paillier-bits").map(str::parse::<usize>) {
        Some(Ok(bits)) => Some(bits),
        Some(Err(e)) => {
            eprintln!("cryptovote keygen: invalid paillier-bits: {}", e);
            std::process::exit(1);
        }
        None => None,
    };

    let mut rng = crate::rng(seed);

    let cipher = PiiCipher::generate(kind, Padding::default(), &mut rng);
    let label = match kind {
        CipherKind::Aes => "aes-key",
        CipherKind::Des => "des-key",
    };
    println!("{}: {}", label, cipher.key_hex());

    if let Some(bits) = paillier_bits {
        info!("Generating Paillier keys (Size: {} bits)...", bits);
        let keypair = PaillierKeyPair::generate(bits, &mut rng).unwrap_or_else(|e| {
            eprintln!("cryptovote keygen: {}", e);
            std::process::exit(1);
        });
        println!("paillier-n: {:x}", keypair.public.n);
        println!("paillier-lambda: {:x}", keypair.lambda());
        println!("paillier-mu: {:x}", keypair.mu());
    }
}
