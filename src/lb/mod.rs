//! Scraper for the lb.lt collector and commemorative coin catalog.

mod detail;
mod listing;

pub use detail::extract_detail;
pub use listing::ListingWalker;

use serde::Serialize;
use std::fmt;

pub const BASE_URL: &str = "https://www.lb.lt";
pub const LIST_URL: &str = "https://www.lb.lt/lt/kolekcines-ir-progines-monetos-sarasas";

/// One entry of a listing page: just enough to reach the detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinListing {
    pub name: String,
    pub url: String,
    pub image_url: Option<String>,
}

/// Everything a detail page may carry. A page with unexpected markup
/// yields all fields `None`; that is a valid degraded result, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoinDetail {
    pub description: Option<String>,
    pub denomination: Option<String>,
    pub metal: Option<String>,
    pub diameter_mm: Option<f64>,
    pub weight_grams: Option<f64>,
    pub mintage: Option<i64>,
    pub year: Option<i32>,
    pub image_url: Option<String>,
}

/// A fully populated catalog record. `external_id` is the detail page url
/// and is the dedup key across scrape runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coin {
    pub name: String,
    pub external_id: String,
    pub description: Option<String>,
    pub denomination: Option<String>,
    pub metal: Option<String>,
    pub diameter_mm: Option<f64>,
    pub weight_grams: Option<f64>,
    pub mintage: Option<i64>,
    pub year: Option<i32>,
    pub image_url: Option<String>,
}

impl Coin {
    /// Merge a listing entry with its detail page. The detail-page image is
    /// higher resolution than the listing thumbnail and wins when present.
    pub fn from_parts(listing: CoinListing, detail: CoinDetail) -> Coin {
        Coin {
            name: listing.name,
            external_id: listing.url,
            description: detail.description,
            denomination: detail.denomination,
            metal: detail.metal,
            diameter_mm: detail.diameter_mm,
            weight_grams: detail.weight_grams,
            mintage: detail.mintage,
            year: detail.year,
            image_url: detail.image_url.or(listing.image_url),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "None".to_string(), T::to_string)
        }

        writeln!(f, "Name         : {}", self.name)?;
        writeln!(f, "External id  : {}", self.external_id)?;
        writeln!(f, "Denomination : {}", opt(&self.denomination))?;
        writeln!(f, "Metal        : {}", opt(&self.metal))?;
        writeln!(f, "Diameter mm  : {}", opt(&self.diameter_mm))?;
        writeln!(f, "Weight g     : {}", opt(&self.weight_grams))?;
        writeln!(f, "Mintage      : {}", opt(&self.mintage))?;
        writeln!(f, "Year         : {}", opt(&self.year))?;
        writeln!(f, "Image        : {}", opt(&self.image_url))?;
        if let Some(d) = self.description.as_ref() {
            writeln!(f, "Description  : ")?;
            for p in d.split("\n\n") {
                writeln!(f, "> {}", p)?;
            }
        } else {
            writeln!(f, "Description  : None")?;
        }
        Ok(())
    }
}
