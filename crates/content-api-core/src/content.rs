/// Substitute `{{i}}` placeholders in post content with `urls[i]`.
///
/// Placeholders without a matching URL are left in place. Indices are
/// replaced from highest to lowest so `{{1}}` never matches inside `{{11}}`.
#[must_use]
pub fn replace_image_variables(content: &str, urls: &[String]) -> String {
    urls.iter()
        .enumerate()
        .rev()
        .fold(content.to_string(), |acc, (index, url)| {
            acc.replace(&format!("{{{{{index}}}}}"), url)
        })
}
