use crate::{client::HEADER_LINK, Params};
use url::Url;

/// Represents `Pagination` information from a Github API request
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pagination {
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
    pub first_page: Option<usize>,
    pub last_page: Option<usize>,

    pub next_page_token: Option<String>,
}

impl Pagination {
    pub(super) fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let mut pagination = Self::default();

        let links = if let Some(links) = headers.get(HEADER_LINK).and_then(|h| h.to_str().ok()) {
            links
        } else {
            return pagination;
        };

        for link in links.split(',') {
            let segments: Vec<&str> = link.split(';').map(str::trim).collect();

            // Skip if we don't at least have href and rel
            if segments.len() < 2 {
                continue;
            }

            let url = match parse_href(segments[0]) {
                Some(url) => url,
                None => continue,
            };

            let page = match url
                .query_pairs()
                .find_map(|(k, v)| if k == "page" { Some(v) } else { None })
            {
                Some(page) => page,
                None => continue,
            };

            for rel in &segments[1..] {
                match *rel {
                    "rel=\"next\"" => {
                        if let Ok(n) = page.parse() {
                            pagination.next_page = Some(n);
                        } else {
                            pagination.next_page_token = Some(page.clone().into_owned());
                        }
                    }
                    "rel=\"prev\"" => pagination.prev_page = page.parse().ok(),
                    "rel=\"first\"" => pagination.first_page = page.parse().ok(),
                    "rel=\"last\"" => pagination.last_page = page.parse().ok(),
                    _ => {}
                }
            }
        }

        pagination
    }

    pub fn has_next(&self) -> bool {
        self.next_page.is_some() || self.next_page_token.is_some()
    }
}

// `<https://api.github.com/...>`
fn parse_href(segment: &str) -> Option<Url> {
    if segment.starts_with('<') && segment.ends_with('>') {
        Url::parse(&segment[1..segment.len() - 1]).ok()
    } else {
        None
    }
}

/// Page selection understood by every list endpoint
#[derive(Debug, Default, Clone, Copy)]
pub struct PaginationOptions {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PaginationOptions {
    pub fn page(page: usize) -> Self {
        Self {
            page: Some(page),
            per_page: None,
        }
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

impl From<PaginationOptions> for Params {
    fn from(options: PaginationOptions) -> Self {
        let mut params = Params::new();
        if let Some(page) = options.page {
            params.insert("page", page as i64);
        }
        if let Some(per_page) = options.per_page {
            params.insert("per_page", per_page as i64);
        }
        params
    }
}
