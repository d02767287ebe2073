/// One page of a category listing
///
/// Page 1 is the bare category URL. Every later page appends `/page/N/` to
/// the category URL with its trailing slashes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef<'a> {
    pub category_url: &'a str,
    pub number: u32,
}

impl<'a> PageRef<'a> {
    pub fn new(category_url: &'a str, number: u32) -> Self {
        Self {
            category_url,
            number,
        }
    }

    /// Returns the fetchable URL of this page
    ///
    /// # Examples
    ///
    /// ```
    /// use comic_harvester::url::PageRef;
    ///
    /// let first = PageRef::new("https://example.org/category/dc/", 1);
    /// assert_eq!(first.url(), "https://example.org/category/dc/");
    ///
    /// let third = PageRef::new("https://example.org/category/dc/", 3);
    /// assert_eq!(third.url(), "https://example.org/category/dc/page/3/");
    /// ```
    pub fn url(&self) -> String {
        if self.number <= 1 {
            self.category_url.to_string()
        } else {
            format!(
                "{}/page/{}/",
                self.category_url.trim_end_matches('/'),
                self.number
            )
        }
    }
}
