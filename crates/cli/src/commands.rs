//! CLI subcommands

use anyhow::{Context, Result};
use carelink_client::AuthService;
use carelink_client::types::{LoginRequest, RegisterRequest};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Account role, "patient" or "doctor"
        #[arg(long, default_value = "patient")]
        role: String,
    },
    /// End the session locally and notify the server
    Logout,
    /// Validate the persisted session and print the profile
    Me,
    /// Exchange the stored refresh token for a new token pair
    Refresh,
    /// List the logged-in user's appointments
    Appointments,
}

impl Commands {
    pub async fn execute(self, auth: &AuthService) -> Result<()> {
        match self {
            Commands::Login { email, password } => {
                auth.login(&LoginRequest { email, password })
                    .await
                    .context("login failed")?;
                let user = auth.session().user()?.context("no profile stored")?;
                println!("Logged in as {} ({})", user.email, user.role_or_guest());
            }
            Commands::Register {
                email,
                password,
                first_name,
                last_name,
                role,
            } => {
                let request = RegisterRequest::new(email, password, first_name, last_name, role);
                auth.register(&request).await.context("registration failed")?;
                let user = auth.session().user()?.context("no profile stored")?;
                println!("Registered and logged in as {}", user.email);
            }
            Commands::Logout => {
                auth.logout().await?;
                println!("Logged out");
            }
            Commands::Me => {
                auth.initialize().await.context("session validation failed")?;
                match auth.session().user()? {
                    Some(user) => {
                        println!("{}", serde_json::to_string_pretty(&user)?);
                    }
                    None => println!("Not logged in"),
                }
            }
            Commands::Refresh => {
                auth.refresh_auth_token().await.context("refresh failed")?;
                println!("Token refreshed");
            }
            Commands::Appointments => {
                auth.initialize().await.context("session validation failed")?;
                let appointments = auth.client().my_appointments().await?;
                if appointments.is_empty() {
                    println!("No appointments");
                }
                for appt in appointments {
                    println!(
                        "#{} {} -> {} with doctor {} [{}]{}",
                        appt.id,
                        appt.start_time.format("%Y-%m-%d %H:%M"),
                        appt.end_time.format("%H:%M"),
                        appt.doctor_id,
                        appt.status,
                        appt.notes
                            .as_deref()
                            .map(|n| format!(" - {n}"))
                            .unwrap_or_default()
                    );
                }
            }
        }
        Ok(())
    }
}
