/// URL of a listing page. Page 1 (and 0) is the listing root itself.
pub fn listing_page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        base_url.to_string()
    } else {
        format!("{}/page/{}", base_url.trim_end_matches('/'), page)
    }
}
