use anyhow::Result;
use env_logger::Env;
use log::info;

use terpcord_scraper::{write_json, Encoding, Fetcher, Term, UmdIo};

const SEMESTER: &str = "202508";
const OUTPUT: &str = "dept_sections/all_sections.json";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let semester: Term = SEMESTER.parse()?;
    let sections = UmdIo::new(Fetcher::new()?, semester).all_sections().await?;

    write_json(OUTPUT, &sections, Encoding::Utf8)?;
    info!("Wrote a total of {} sections to {OUTPUT}", sections.len());

    Ok(())
}
