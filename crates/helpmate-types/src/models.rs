use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account kind chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    JobSeeker,
    Business,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobSeeker => "job_seeker",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user type '{0}'")]
pub struct UnknownUserType(pub String);

impl FromStr for UserType {
    type Err = UnknownUserType;

    /// Accepts any casing, e.g. `job_seeker` or `JOB_SEEKER`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "job_seeker" => Ok(Self::JobSeeker),
            "business" => Ok(Self::Business),
            _ => Err(UnknownUserType(s.to_string())),
        }
    }
}

// -- Pagination --

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page must be between 1 and 4294967295, got {0}")]
    PageOutOfRange(i64),

    #[error("per_page must be between 1 and 4294967295, got {0}")]
    PerPageOutOfRange(i64),
}

/// A validated, 1-indexed page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Rejects values outside `1..=u32::MAX`. Any `per_page` in range is kept
    /// as given, so the window is always `[(page-1)*per_page, page*per_page)`.
    pub fn new(page: i64, per_page: i64) -> Result<Self, PageError> {
        let page = u32::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(PageError::PageOutOfRange(page))?;
        let per_page = u32::try_from(per_page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(PageError::PerPageOutOfRange(per_page))?;
        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of rows to skip before this page starts.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1).saturating_mul(self.per_page as i64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as u32,
            per_page: DEFAULT_PER_PAGE as u32,
        }
    }
}

/// One page of an ordered result set plus the numbers needed to navigate it.
/// A page past the end simply carries no items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.request.page()
    }

    pub fn per_page(&self) -> u32 {
        self.request.per_page()
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.request.per_page() as u64)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page() > 1
    }

    pub fn has_next(&self) -> bool {
        (self.current_page() as u64) < self.total_pages()
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev().then(|| self.current_page() - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.current_page() + 1)
    }

    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total: u64, page: i64, per_page: i64) -> Paginated<()> {
        Paginated::new(vec![], total, PageRequest::new(page, per_page).unwrap())
    }

    #[test]
    fn test_user_type_parsing() {
        assert_eq!("job_seeker".parse::<UserType>().unwrap(), UserType::JobSeeker);
        assert_eq!("JOB_SEEKER".parse::<UserType>().unwrap(), UserType::JobSeeker);
        assert_eq!("Business".parse::<UserType>().unwrap(), UserType::Business);
        assert_eq!(
            "recruiter".parse::<UserType>().unwrap_err().to_string(),
            "unknown user type 'recruiter'"
        );
        assert_eq!(UserType::Business.to_string(), "business");
    }

    #[test]
    fn test_page_request_bounds() {
        assert_eq!(PageRequest::new(0, 10), Err(PageError::PageOutOfRange(0)));
        assert_eq!(PageRequest::new(1, 0), Err(PageError::PerPageOutOfRange(0)));
        assert_eq!(PageRequest::new(1, -5), Err(PageError::PerPageOutOfRange(-5)));
        assert_eq!(
            PageError::PageOutOfRange(0).to_string(),
            "page must be between 1 and 4294967295, got 0"
        );
        assert_eq!(PageRequest::new(2, 500).unwrap().per_page(), 500);
        assert_eq!(PageRequest::new(2, 500).unwrap().offset(), 500);
        assert_eq!(
            PageRequest::new(1, i64::MAX),
            Err(PageError::PerPageOutOfRange(i64::MAX))
        );
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
        let far = PageRequest::new(u32::MAX as i64, u32::MAX as i64).unwrap();
        assert_eq!(far.offset(), i64::MAX);
        assert_eq!(PageRequest::default(), PageRequest::new(1, 10).unwrap());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(page_of(0, 1, 10).total_pages(), 0);
        assert_eq!(page_of(1, 1, 10).total_pages(), 1);
        assert_eq!(page_of(10, 1, 10).total_pages(), 1);
        assert_eq!(page_of(11, 1, 10).total_pages(), 2);
        assert_eq!(page_of(15, 1, 10).total_pages(), 2);
        assert_eq!(page_of(250, 1, 150).total_pages(), 2);
    }

    #[test]
    fn test_navigation_flags() {
        let first = page_of(15, 1, 10);
        assert!(!first.has_prev());
        assert!(first.has_next());
        assert_eq!(first.prev_page(), None);
        assert_eq!(first.next_page(), Some(2));

        let last = page_of(15, 2, 10);
        assert!(last.has_prev());
        assert!(!last.has_next());
        assert_eq!(last.prev_page(), Some(1));
        assert_eq!(last.next_page(), None);
    }

    #[test]
    fn test_page_past_the_end() {
        let p = page_of(2, 1000, 10);
        assert_eq!(p.total_pages(), 1);
        assert!(!p.has_next());
        assert!(p.has_prev());
        assert_eq!(p.prev_page(), Some(999));

        let empty = page_of(0, 1, 10);
        assert!(!empty.has_next());
        assert!(!empty.has_prev());
    }
}
