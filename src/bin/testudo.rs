use anyhow::Result;
use env_logger::Env;
use log::info;

use terpcord_scraper::{write_json, Encoding, Fetcher, Term, Testudo};

const TERM: &str = "202508";
const OUTPUT: &str = "data.json";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let term: Term = TERM.parse()?;
    let catalog = Testudo::new(Fetcher::new()?, term).catalog().await?;

    write_json(OUTPUT, &catalog, Encoding::Ascii)?;

    let courses: usize = catalog.depts.iter().map(|dept| dept.courses.len()).sum();
    info!(
        "Wrote {} departments and {courses} courses to {OUTPUT}",
        catalog.depts.len()
    );

    Ok(())
}
