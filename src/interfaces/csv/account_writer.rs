use crate::domain::account::Account;
use crate::error::Result;
use std::io::Write;

/// Writes final account states as CSV, sorted by account id for stable
/// output.
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, mut accounts: Vec<Account>) -> Result<()> {
        accounts.sort_by(|a, b| a.id.cmp(&b.id));

        self.writer
            .write_record(["id", "role", "total_spent", "tier", "wallet_balance"])?;
        for account in accounts {
            self.writer.write_record([
                account.id.as_str(),
                account.role.as_str(),
                &account.total_spent.0.to_string(),
                &account.tier.rank().to_string(),
                &account.wallet_balance.0.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
