use std::process::ExitCode;
use std::time::{Duration, SystemTime};

use clap::{Parser, Subcommand, ValueEnum};
use gatekeeper::auth::claims::{Identity, Role};
use gatekeeper::auth::jwt::{mint_session_token, verify_session_token, SessionSubject};
use gatekeeper::state::security_config::SecurityConfig;

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    Moderator,
    User,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::Moderator => Role::Moderator,
            RoleArg::User => Role::User,
        }
    }
}

#[derive(Parser)]
#[command(name = "session-cli")]
#[command(about = "Mint and inspect gatekeeper session tokens (uses GATE_JWT_SECRET)")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a signed session token
    Mint {
        /// Subject (user id) the token identifies
        #[arg(long)]
        sub: String,

        /// Role label to embed
        #[arg(long, value_enum)]
        role: Option<RoleArg>,

        /// Set the legacy `isAdmin` flag
        #[arg(long)]
        legacy_admin: bool,

        #[arg(long)]
        email: Option<String>,

        /// Token lifetime in minutes
        #[arg(long, default_value_t = 60)]
        ttl_minutes: u64,
    },
    /// Verify a token and print the identity the gate would see
    Inspect {
        token: String,
    },
}

fn ttl_from_minutes(minutes: u64) -> Option<Duration> {
    minutes.checked_mul(60).map(Duration::from_secs)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_env_filter("session_cli=info,gatekeeper=warn")
        .init();

    let args = Args::parse();

    let security = match SecurityConfig::from_env() {
        Ok(security) => security,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Mint {
            sub,
            role,
            legacy_admin,
            email,
            ttl_minutes,
        } => {
            let mut subject = SessionSubject::new(sub);
            if let Some(role) = role {
                subject = subject.with_role(role.into());
            }
            if legacy_admin {
                subject = subject.with_legacy_admin(true);
            }
            if let Some(email) = email {
                subject = subject.with_email(email);
            }

            let Some(ttl) = ttl_from_minutes(ttl_minutes) else {
                eprintln!("❌ --ttl-minutes {ttl_minutes} is out of range");
                return ExitCode::FAILURE;
            };
            match mint_session_token(&subject, SystemTime::now(), ttl, &security) {
                Ok(token) => {
                    tracing::info!(sub = %subject.sub, ttl_minutes, "minted session token");
                    println!("{token}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Inspect { token } => match verify_session_token(token.trim(), &security) {
            Ok(claims) => {
                let identity = Identity::from(claims);
                match serde_json::to_string_pretty(&identity) {
                    Ok(json) => {
                        println!("{json}");
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("❌ {e}");
                        ExitCode::FAILURE
                    }
                }
            }
            Err(e) => {
                eprintln!("❌ token rejected: {e} ({})", e.reason());
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_from_minutes() {
        assert_eq!(ttl_from_minutes(60), Some(Duration::from_secs(3600)));
        assert_eq!(ttl_from_minutes(u64::MAX), None);
    }

    #[test]
    fn test_mint_args_parse() {
        let args = Args::try_parse_from([
            "session-cli",
            "mint",
            "--sub",
            "user-1",
            "--role",
            "admin",
            "--ttl-minutes",
            "5",
        ])
        .unwrap();

        match args.command {
            Command::Mint {
                sub,
                role,
                ttl_minutes,
                ..
            } => {
                assert_eq!(sub, "user-1");
                assert!(matches!(role, Some(RoleArg::Admin)));
                assert_eq!(ttl_minutes, 5);
            }
            Command::Inspect { .. } => panic!("expected mint"),
        }
    }
}
