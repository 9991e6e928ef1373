use crate::error::DispatchError;
use crate::models::Listing;
use crate::notify::NotificationChannel;
use async_trait::async_trait;
use std::io::Write;

const RULE_WIDTH: usize = 60;

/// Prints new listings to stdout
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn render(listings: &[Listing]) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        out.push_str(&format!("\n{rule}\n"));
        out.push_str(&format!(
            "🏠 NEW APARTMENT LISTINGS FOUND! ({} listings)\n",
            listings.len()
        ));
        out.push_str(&format!("{rule}\n"));
        for (i, listing) in listings.iter().enumerate() {
            out.push_str(&format!(
                "\n{}. {}\n   💰 {}\n   📍 {}\n   📋 {}\n   🔗 {}\n",
                i + 1,
                listing.title,
                listing.price,
                listing.location,
                listing.details,
                listing.link
            ));
        }
        out.push_str(&format!("\n{rule}\n"));
        out
    }
}

#[async_trait]
impl NotificationChannel for ConsoleNotifier {
    async fn deliver(&self, listings: &[Listing]) -> Result<(), DispatchError> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(Self::render(listings).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
