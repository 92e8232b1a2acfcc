//! Interactive crawl mode selection
//!
//! Reads the user's choice from a text stream. Bad input never fails: each
//! prompt falls back to a documented default and says so.

use crate::crawler::CrawlMode;
use std::io::{self, BufRead, Write};
use std::num::NonZeroU32;

/// Page scraped when the requested page number is invalid
pub const DEFAULT_PAGE: NonZeroU32 = match NonZeroU32::new(1) {
    Some(page) => page,
    None => unreachable!(),
};

/// Number of pages scraped when the requested count is invalid
pub const DEFAULT_PAGE_COUNT: NonZeroU32 = match NonZeroU32::new(5) {
    Some(count) => count,
    None => unreachable!(),
};

/// Entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AllPages,
    SpecificPage,
    FirstPages,
}

/// Parses a menu entry number, or None if it is not 1, 2 or 3
pub fn parse_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::AllPages),
        "2" => Some(MenuChoice::SpecificPage),
        "3" => Some(MenuChoice::FirstPages),
        _ => None,
    }
}

/// Parses a positive integer, or None for anything else
pub fn parse_positive(input: &str) -> Option<NonZeroU32> {
    input.trim().parse::<NonZeroU32>().ok()
}

/// Page number to scrape, defaulting to page 1
pub fn parse_page_number(input: &str) -> NonZeroU32 {
    parse_positive(input).unwrap_or(DEFAULT_PAGE)
}

/// Number of pages to scrape, defaulting to 5
pub fn parse_page_count(input: &str) -> NonZeroU32 {
    parse_positive(input).unwrap_or(DEFAULT_PAGE_COUNT)
}

/// Shows the menu on `output` and reads the crawl mode from `input`
///
/// End of input counts as invalid input and selects the defaults.
pub fn prompt_mode<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<CrawlMode> {
    writeln!(output, "Choose scraping option:")?;
    writeln!(output, "1. Scrape all pages")?;
    writeln!(output, "2. Scrape specific page")?;
    writeln!(output, "3. Scrape first N pages")?;

    let choice = match parse_choice(&ask(input, output, "Enter your choice (1-3): ")?) {
        Some(choice) => choice,
        None => {
            writeln!(output, "Invalid choice. Scraping all pages by default.")?;
            MenuChoice::AllPages
        }
    };

    let mode = match choice {
        MenuChoice::AllPages => CrawlMode::All,
        MenuChoice::SpecificPage => {
            let answer = ask(input, output, "Enter page number to scrape: ")?;
            let page = match parse_positive(&answer) {
                Some(page) => page,
                None => {
                    writeln!(output, "Invalid page number. Using page {}.", DEFAULT_PAGE)?;
                    DEFAULT_PAGE
                }
            };
            CrawlMode::SinglePage(page)
        }
        MenuChoice::FirstPages => {
            let answer = ask(input, output, "Enter number of pages to scrape: ")?;
            let count = match parse_positive(&answer) {
                Some(count) => count,
                None => {
                    writeln!(output, "Invalid number. Using {} pages.", DEFAULT_PAGE_COUNT)?;
                    DEFAULT_PAGE_COUNT
                }
            };
            CrawlMode::FirstPages(count)
        }
    };

    Ok(mode)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}
