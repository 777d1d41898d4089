use crate::{
    lb::{CoinDetail, BASE_URL},
    parse::{normalize_url, parse_decimal, parse_quantity, parse_year},
};
use lazy_regex::regex;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref DETAIL_IMG: Selector = Selector::parse(".coin-left .coin_pic img").expect(E);
    static ref DESCRIPTION: Selector =
        Selector::parse(".container-fluid.coin-content .text").expect(E);
    static ref INFO: Selector = Selector::parse(".info.col-xs-12 .text").expect(E);
    static ref INFO_ROW: Selector = Selector::parse("div").expect(E);
    static ref VALUE: Selector = Selector::parse(".value strong").expect(E);
    static ref P: Selector = Selector::parse("p").expect(E);
}

enum InfoField {
    Denomination,
    Metal,
    Diameter,
    Weight,
    Mintage,
    IssueDate,
}

// Label prefixes as they appear on lb.lt detail pages. Rows with any other
// label fall through untouched, so new fields on the site never break a run.
const INFO_LABELS: &[(&str, InfoField)] = &[
    ("Nominalas", InfoField::Denomination),
    ("Metalas", InfoField::Metal),
    ("Skersmuo", InfoField::Diameter),
    ("Masė", InfoField::Weight),
    ("Tiražas", InfoField::Mintage),
    ("Išleidimo data", InfoField::IssueDate),
];

/// Extract all coin attributes a detail page carries.
///
/// Best-effort by design: a malformed or unexpected document yields a
/// `CoinDetail` with every field `None` rather than an error.
pub fn extract_detail(doc: &Html) -> CoinDetail {
    let mut detail = CoinDetail::default();

    if let Some(img) = doc.select(&DETAIL_IMG).next() {
        if let Some(src) = img.value().attr("src").filter(|s| !s.is_empty()) {
            detail.image_url = Some(normalize_url(src, BASE_URL));
        }
    }

    if let Some(block) = doc.select(&DESCRIPTION).next() {
        let paragraphs: Vec<String> = block
            .select(&P)
            .map(|p| collapsed_text(&p))
            .filter(|p| !p.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            detail.description = Some(paragraphs.join("\n\n"));
        }
    }

    if let Some(info) = doc.select(&INFO).next() {
        for row in info.select(&INFO_ROW) {
            let Some(value_node) = row.select(&VALUE).next() else {
                continue;
            };
            let value = collapsed_text(&value_node);
            if value.is_empty() {
                continue;
            }

            let label = collapsed_text(&row);
            let Some((_, field)) = INFO_LABELS.iter().find(|(l, _)| label.starts_with(l)) else {
                continue;
            };

            match field {
                InfoField::Denomination => detail.denomination = Some(value),
                InfoField::Metal => detail.metal = Some(value),
                InfoField::Diameter => detail.diameter_mm = parse_decimal(&value),
                InfoField::Weight => detail.weight_grams = parse_decimal(&value),
                InfoField::Mintage => detail.mintage = parse_quantity(&value),
                InfoField::IssueDate => detail.year = parse_year(&value),
            }
        }
    }

    detail
}

// Descendant text with runs of whitespace (NBSP included) collapsed to a
// single space, then trimmed. An NBSP-only paragraph collapses to "".
fn collapsed_text(el: &ElementRef) -> String {
    let text = el.text().collect::<String>();
    regex!(r"\s+").replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn description_drops_blank_and_nbsp_paragraphs() {
        let doc = Html::parse_document(
            r#"<div class="container-fluid coin-content"><div class="text">
                <p></p>
                <p>   </p>
                <p>&nbsp;</p>
                <p>Hello</p>
                <p>World</p>
            </div></div>"#,
        );
        let detail = extract_detail(&doc);
        assert_eq!(detail.description.as_deref(), Some("Hello\n\nWorld"));
    }

    #[test]
    fn description_absent_when_no_paragraph_survives() {
        let doc = Html::parse_document(
            r#"<div class="container-fluid coin-content"><div class="text">
                <p>&nbsp;</p>
            </div></div>"#,
        );
        assert_eq!(extract_detail(&doc).description, None);
    }

    #[test]
    fn info_rows_with_empty_value_are_skipped() {
        let doc = Html::parse_document(
            r#"<div class="info col-xs-12"><div class="text">
                <div>Nominalas <span class="value"><strong>  </strong></span></div>
                <div>Metalas</div>
                <div>Tiražas <span class="value"><strong>0 vnt.</strong></span></div>
            </div></div>"#,
        );
        let detail = extract_detail(&doc);
        assert_eq!(detail.denomination, None);
        assert_eq!(detail.metal, None);
        assert_eq!(detail.mintage, None);
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let doc = Html::parse_document(
            r#"<div class="info col-xs-12"><div class="text">
                <div>Briauna <span class="value"><strong>šonas lygus</strong></span></div>
                <div>Metalas <span class="value"><strong>Au 999</strong></span></div>
            </div></div>"#,
        );
        let detail = extract_detail(&doc);
        assert_eq!(detail.metal.as_deref(), Some("Au 999"));
        assert_eq!(detail.denomination, None);
    }
}
