use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "MANGA_READER_PORT")]
    pub port: u16,

    /// Path to data directory
    #[arg(short, long, default_value = "./data", env = "MANGA_READER_DATA_DIR")]
    pub data_dir: String,

    /// Accounts with these emails are administrators
    #[arg(
        long = "admin-email",
        env = "MANGA_READER_ADMIN_EMAILS",
        value_delimiter = ','
    )]
    pub admin_emails: Vec<String>,

    /// How long a session token stays valid, in hours (at least 1)
    #[arg(
        long,
        default_value_t = 168,
        env = "MANGA_READER_SESSION_TTL_HOURS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub session_ttl_hours: u32,
}

impl Args {
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(self.admin_emails.clone(), self.session_ttl_hours)
    }
}

/// Settings the HTTP layer needs when signing users up and in.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    admin_emails: Vec<String>,
    pub session_ttl_secs: i64,
}

impl AuthConfig {
    pub fn new(admin_emails: Vec<String>, session_ttl_hours: u32) -> Self {
        let admin_emails = admin_emails
            .iter()
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();

        Self {
            admin_emails,
            // u32 hours in seconds always fits in i64.
            session_ttl_secs: i64::from(session_ttl_hours) * 60 * 60,
        }
    }

    pub fn admin_emails(&self) -> &[String] {
        &self.admin_emails
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|admin| *admin == email)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(Vec::new(), 168)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let args = Args::parse_from(["manga-reader"]);
        assert_eq!(args.port, 3000);
        assert_eq!(args.data_dir, "./data");
        assert!(args.admin_emails.is_empty());
        assert_eq!(args.auth_config().session_ttl_secs, 168 * 3600);
    }

    #[test]
    fn session_ttl_must_be_a_positive_hour_count() {
        for bad in ["-5", "0", "9223372036854775807", "soon"] {
            let parsed = Args::try_parse_from(["manga-reader", "--session-ttl-hours", bad]);
            assert!(parsed.is_err(), "accepted {bad}");
        }

        let args = Args::parse_from(["manga-reader", "--session-ttl-hours", "4294967295"]);
        assert_eq!(
            args.auth_config().session_ttl_secs,
            4_294_967_295_i64 * 3600
        );
    }

    #[test]
    fn admin_emails_split_on_commas() {
        let args = Args::parse_from([
            "manga-reader",
            "--admin-email",
            "Boss@Example.com, ops@example.com",
            "--admin-email",
            "third@example.com",
        ]);
        let auth = args.auth_config();

        assert_eq!(auth.admin_emails().len(), 3);
        assert!(auth.is_admin_email("boss@example.com"));
        assert!(auth.is_admin_email("OPS@example.com"));
        assert!(!auth.is_admin_email("reader@example.com"));
    }
}
