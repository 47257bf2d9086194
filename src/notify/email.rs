// src/notify/email.rs
//! SMTP summary email. The config names the environment variables that hold
//! the actual settings; anything missing or malformed disables the notifier
//! with a warning instead of failing the run.

use anyhow::{Context, Result};
use chrono::Utc;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use crate::config::EmailCfg;
use crate::ingest::types::Listing;

const DEFAULT_SMTP_PORT: u16 = 587;

pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    subject_prefix: String,
}

impl EmailNotifier {
    /// Assemble the notifier from the environment, using the variable names
    /// carried by `cfg`. Returns `None` (with a warning) when any required
    /// variable is absent or unusable.
    pub fn from_env(cfg: &EmailCfg) -> Option<Self> {
        let mut missing: Vec<&str> = Vec::new();
        let from_addr = require_env(&cfg.from_env, &mut missing);
        let to_addr = require_env(&cfg.to_env, &mut missing);
        let host = require_env(&cfg.host_env, &mut missing);
        let user = require_env(&cfg.user_env, &mut missing);
        let pass = require_env(&cfg.pass_env, &mut missing);
        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "email notifications disabled");
            return None;
        }
        let (from_addr, to_addr, host, user, pass) =
            (from_addr?, to_addr?, host?, user?, pass?);

        let port = match std::env::var(&cfg.port_env) {
            Ok(v) => v.trim().parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!(
                    var = %cfg.port_env,
                    value = %v,
                    "smtp port not a number, using {DEFAULT_SMTP_PORT}"
                );
                DEFAULT_SMTP_PORT
            }),
            Err(_) => DEFAULT_SMTP_PORT,
        };

        let from = parse_mailbox(&cfg.from_env, &from_addr)?;
        let to = parse_mailbox(&cfg.to_env, &to_addr)?;

        let mailer = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host) {
            Ok(builder) => builder
                .port(port)
                .credentials(Credentials::new(user, pass))
                .build(),
            Err(e) => {
                tracing::warn!(error = ?e, host = %host, "invalid smtp relay, email disabled");
                return None;
            }
        };

        Some(Self {
            mailer,
            from,
            to,
            subject_prefix: cfg.subject_prefix.clone(),
        })
    }

    /// Send the run summary. Transport problems are logged and swallowed; a
    /// failed email must not fail a run that already wrote its reports.
    pub async fn notify(&self, matches: &[Listing], keywords: &[String]) {
        if let Err(e) = self.send_summary(matches, keywords).await {
            tracing::error!(error = ?e, "email notification failed");
        }
    }

    async fn send_summary(&self, matches: &[Listing], keywords: &[String]) -> Result<()> {
        let subject = build_subject(&self.subject_prefix, matches.len());
        let body = build_html_body(&subject, matches, keywords);
        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_HTML)
            .body(body)
            .context("build email")?;
        self.mailer.send(msg).await.context("send email")?;
        tracing::info!(matches = matches.len(), "summary email sent");
        Ok(())
    }
}

fn require_env<'a>(name: &'a str, missing: &mut Vec<&'a str>) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => {
            missing.push(name);
            None
        }
    }
}

fn parse_mailbox(var: &str, value: &str) -> Option<Mailbox> {
    match value.parse() {
        Ok(mb) => Some(mb),
        Err(e) => {
            tracing::warn!(error = ?e, var, "invalid mailbox address, email disabled");
            None
        }
    }
}

fn build_subject(prefix: &str, match_count: usize) -> String {
    format!(
        "{prefix} {match_count} match(es) – {}",
        Utc::now().format("%Y-%m-%d")
    )
}

fn build_html_body(subject: &str, matches: &[Listing], keywords: &[String]) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<h2>{}</h2>\n",
        html_escape::encode_text(subject)
    ));
    body.push_str(&format!(
        "<p>Keywords: {}</p>\n",
        html_escape::encode_text(&keywords.join(", "))
    ));
    if matches.is_empty() {
        body.push_str("<p>No matches today.</p>\n");
        return body;
    }
    body.push_str("<ol>\n");
    for m in matches {
        let title = m.title.replace('\n', " ");
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a> ({})</li>\n",
            html_escape::encode_double_quoted_attribute(&m.url),
            html_escape::encode_text(&title),
            html_escape::encode_text(&m.feed_name),
        ));
    }
    body.push_str("</ol>\n");
    body
}
