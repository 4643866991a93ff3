use std::error::Error;

use chrono::NaiveDate;
use rides_core::record::DayTable;
use rides_core::run::DaySink;

/// Keeps every table it is given.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub tables: Vec<DayTable>,
}

impl DaySink for MemorySink {
    fn write_day(&mut self, table: &DayTable) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.tables.push(table.clone());
        Ok(format!("memory://{}", table.date))
    }
}

/// Fails on the listed dates, accepts everything else.
#[derive(Debug, Default)]
pub struct FlakySink {
    pub fail_on: Vec<NaiveDate>,
    pub written: Vec<NaiveDate>,
}

impl DaySink for FlakySink {
    fn write_day(&mut self, table: &DayTable) -> Result<String, Box<dyn Error + Send + Sync>> {
        if self.fail_on.contains(&table.date) {
            return Err(format!("disk full writing {}", table.date).into());
        }
        self.written.push(table.date);
        Ok(format!("flaky://{}", table.date))
    }
}
