use cryptovote::*;
use std::convert::TryFrom;
use std::fmt::Display;
use std::io::{self, BufRead};
use std::str::FromStr;

pub const ENV_CANDIDATES: &str = "CRYPTOVOTE_CANDIDATES";
pub const ENV_MAX_VOTERS: &str = "CRYPTOVOTE_MAX_VOTERS";
pub const ENV_VOTES: &str = "CRYPTOVOTE_VOTES";
pub const ENV_KEY_BITS: &str = "CRYPTOVOTE_KEY_BITS";
pub const ENV_CIPHER: &str = "CRYPTOVOTE_CIPHER";
pub const ENV_PADDING: &str = "CRYPTOVOTE_PADDING";
pub const ENV_SEED: &str = "CRYPTOVOTE_SEED";

/// Look up a setting: the command-line argument wins, then the environment variable.
pub fn setting<T>(matches: &clap::ArgMatches, name: &str, env_var: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    let env_value = std::env::var(env_var).ok();
    let raw = match matches.value_of(name) {
        Some(value) => value.to_string(),
        None => match env_value {
            Some(value) => value,
            None => return Ok(None),
        },
    };

    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| format!("invalid {} '{}': {}", name, raw, e))
}

/// Settings of a `simulate` run
pub struct SimulateConfig {
    pub params: SimulationParams,
    pub cipher: CipherKind,
    pub padding: Padding,
    pub seed: Option<u64>,
    pub format: Format,
    pub output: Option<String>,
    pub secrets: Option<String>,
    pub open: Vec<usize>,
}

impl SimulateConfig {
    pub fn from_matches(matches: &clap::ArgMatches) -> Result<Self, String> {
        let candidates: Option<u64> = setting(matches, "candidates", ENV_CANDIDATES)?;
        let max_voters: Option<u64> = setting(matches, "max-voters", ENV_MAX_VOTERS)?;
        let votes: Option<u64> = setting(matches, "votes", ENV_VOTES)?;

        // Whatever is still missing is read from stdin, in order
        let prompts = [
            ("the number of candidates", candidates),
            ("the maximum expected total number of voters (k)", max_voters),
            ("the number of votes to simulate", votes),
        ];
        let missing: Vec<&str> = prompts
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(prompt, _)| *prompt)
            .collect();
        let mut from_stdin = read_integers(&missing)?.into_iter();
        let mut next = |value: Option<u64>| value.or_else(|| from_stdin.next()).unwrap_or(0);

        let num_candidates = to_usize(next(candidates), "candidates")?;
        let max_voters = next(max_voters);
        let num_votes = to_usize(next(votes), "votes")?;

        let mut params = SimulationParams::new(num_candidates, max_voters, num_votes);
        if let Some(key_bits) = setting(matches, "key-bits", ENV_KEY_BITS)? {
            params.key_bits = key_bits;
        }
        params.validate().map_err(|e| e.to_string())?;

        let open = match matches.values_of("open") {
            Some(values) => values
                .map(|v| {
                    v.parse::<usize>()
                        .map_err(|e| format!("invalid ballot index '{}': {}", v, e))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![],
        };

        Ok(SimulateConfig {
            params,
            cipher: setting(matches, "cipher", ENV_CIPHER)?.unwrap_or(CipherKind::Aes),
            padding: setting(matches, "padding", ENV_PADDING)?.unwrap_or_default(),
            seed: setting(matches, "seed", ENV_SEED)?,
            format: matches.value_of("format").unwrap_or("json").parse()?,
            output: matches.value_of("output").map(crate::expand),
            secrets: matches.value_of("secrets").map(crate::expand),
            open,
        })
    }
}

fn to_usize(value: u64, name: &str) -> Result<usize, String> {
    usize::try_from(value).map_err(|_| format!("{} out of range: {}", name, value))
}

// Prompts go to stderr so piped output stays clean
fn read_integers(prompts: &[&str]) -> Result<Vec<u64>, String> {
    if prompts.is_empty() {
        return Ok(vec![]);
    }
    eprintln!("Enter {}:", prompts.join(", "));

    let stdin = io::stdin();
    let mut values = Vec::with_capacity(prompts.len());
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| format!("unable to read stdin: {}", e))?;
        for token in line.split_whitespace() {
            let value = token
                .parse::<u64>()
                .map_err(|e| format!("invalid number '{}': {}", token, e))?;
            values.push(value);
        }
        if values.len() >= prompts.len() {
            break;
        }
    }

    if values.len() < prompts.len() {
        return Err(format!(
            "expected {} numbers on stdin, got {}",
            prompts.len(),
            values.len()
        ));
    }
    values.truncate(prompts.len());
    Ok(values)
}
