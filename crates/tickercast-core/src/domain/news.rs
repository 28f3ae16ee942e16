/// A headline ready for publishing. `id` is the provider uuid, or the article
/// URL when the provider gave none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub id: String,
    pub headline: String,
    pub url: Option<String>,
    pub related_tickers: Vec<String>,
}
