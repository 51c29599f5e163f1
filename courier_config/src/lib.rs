use std::{net::IpAddr, path::Path};

use anyhow::{bail, Context};
use config::{File, FileFormat};
use courier_models::{
    email_address::{EmailAddress, EmailAddressWithName},
    Sensitive,
};
use serde::Deserialize;
use url::Url;

/// Built-in defaults, overridden by any additional config file and then by the
/// environment.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Environment variables and the config keys they override.
pub const ENVIRONMENT_OVERRIDES: &[(&str, &str)] = &[
    ("HTTP_HOST", "http.host"),
    ("HTTP_PORT", "http.port"),
    ("MAIL_PROVIDER", "email.provider"),
    ("MAIL_FROM", "email.from"),
    ("MAIL_USER", "email.smtp.username"),
    ("MAIL_PASS", "email.smtp.password"),
    ("RESEND_API_KEY", "email.resend.api_key"),
    ("MAIL_TO", "contact.recipient"),
];

/// Sender used for resend when `email.from` is not set. Resend accepts it
/// without a verified domain.
const RESEND_DEFAULT_FROM: &str = "onboarding@resend.dev";

/// Load the configuration from the built-in defaults, the given files and the
/// process environment.
pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    let files = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    load_from(&files, |key| std::env::var(key).ok())
}

/// Load the configuration from the built-in defaults, the given toml sources
/// and an environment lookup function. Empty environment values count as unset.
pub fn load_from(
    sources: &[impl AsRef<str>],
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let builder = std::iter::once(DEFAULT_CONFIG)
        .chain(sources.iter().map(AsRef::as_ref))
        .fold(config::Config::builder(), |builder, content| {
            builder.add_source(File::from_str(content, FileFormat::Toml))
        });

    let builder = ENVIRONMENT_OVERRIDES
        .iter()
        .try_fold(builder, |builder, &(var, key)| {
            let value = env(var).filter(|value| !value.is_empty());
            builder.set_override_option(key, value)
        })?;

    builder
        .build()?
        .try_deserialize::<raw::Config>()
        .context("Failed to load config")?
        .try_into()
}

#[derive(Debug)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug)]
pub struct EmailConfig {
    pub from: EmailAddressWithName,
    pub transport: EmailTransportConfig,
}

#[derive(Debug)]
pub enum EmailTransportConfig {
    Smtp(SmtpConfig),
    Resend(ResendConfig),
}

#[derive(Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub username: String,
    pub password: Sensitive<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    None,
    StartTls,
    Tls,
}

#[derive(Debug)]
pub struct ResendConfig {
    pub endpoint_override: Option<Url>,
    pub api_key: Sensitive<String>,
}

#[derive(Debug)]
pub struct ContactConfig {
    pub recipient: EmailAddress,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;

    fn try_from(value: raw::Config) -> Result<Self, Self::Error> {
        let raw::Config {
            http,
            email,
            contact,
        } = value;

        let from = email
            .from
            .as_deref()
            .map(|from| parse_address(from, "email.from"))
            .transpose()?;
        let recipient = contact
            .recipient
            .as_deref()
            .map(|recipient| parse_address(recipient, "contact.recipient"))
            .transpose()?;

        let (from, recipient, transport) = match email.provider {
            raw::EmailProvider::Smtp => {
                let raw::SmtpConfig {
                    host,
                    port,
                    security,
                    username,
                    password,
                } = email.smtp;
                let Some(username) = username else {
                    bail!("Missing smtp username, set MAIL_USER or email.smtp.username");
                };
                let Some(password) = password else {
                    bail!("Missing smtp password, set MAIL_PASS or email.smtp.password");
                };

                let from = match from {
                    Some(from) => from,
                    None => parse_address(&username, "email.smtp.username")?,
                };
                let recipient = match recipient {
                    Some(recipient) => recipient,
                    None => parse_address(&username, "email.smtp.username")?,
                };

                let transport = EmailTransportConfig::Smtp(SmtpConfig {
                    host,
                    port,
                    security,
                    username,
                    password: password.into(),
                });
                (from, recipient, transport)
            }
            raw::EmailProvider::Resend => {
                let Some(api_key) = email.resend.api_key else {
                    bail!("Missing resend api key, set RESEND_API_KEY or email.resend.api_key");
                };
                let Some(recipient) = recipient else {
                    bail!("Missing contact recipient, set MAIL_TO or contact.recipient");
                };
                let from = match from {
                    Some(from) => from,
                    None => parse_address(RESEND_DEFAULT_FROM, "email.from")?,
                };

                let transport = EmailTransportConfig::Resend(ResendConfig {
                    endpoint_override: email.resend.endpoint,
                    api_key: api_key.into(),
                });
                (from, recipient, transport)
            }
        };

        let from = if email.from_name.is_empty() {
            from.into()
        } else {
            from.with_name(email.from_name)
        };

        Ok(Self {
            http,
            email: EmailConfig { from, transport },
            contact: ContactConfig { recipient },
        })
    }
}

fn parse_address(value: &str, key: &str) -> anyhow::Result<EmailAddress> {
    value
        .parse()
        .with_context(|| format!("Invalid email address {value:?} for {key}"))
}

mod raw {
    use serde::Deserialize;
    use url::Url;

    use super::{HttpConfig, SmtpSecurity};

    #[derive(Deserialize)]
    pub struct Config {
        pub http: HttpConfig,
        pub email: EmailConfig,
        #[serde(default)]
        pub contact: ContactConfig,
    }

    #[derive(Deserialize)]
    pub struct EmailConfig {
        pub provider: EmailProvider,
        pub from_name: String,
        pub from: Option<String>,
        pub smtp: SmtpConfig,
        #[serde(default)]
        pub resend: ResendConfig,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum EmailProvider {
        Smtp,
        Resend,
    }

    #[derive(Deserialize)]
    pub struct SmtpConfig {
        pub host: String,
        pub port: u16,
        pub security: SmtpSecurity,
        pub username: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Default, Deserialize)]
    pub struct ResendConfig {
        pub endpoint: Option<Url>,
        pub api_key: Option<String>,
    }

    #[derive(Default, Deserialize)]
    pub struct ContactConfig {
        pub recipient: Option<String>,
    }
}
