//! Query string helpers

use url::Url;

/// Return a copy of `url` with query parameters added or replaced
///
/// Existing keys keep their position and take the new value; repeated
/// occurrences of a replaced key collapse into one. New keys are appended in
/// order. `url` itself is left untouched.
pub fn with_query_params<I, K, V>(url: &Url, params: I) -> Url
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    for (key, value) in params {
        let (key, value) = (key.as_ref(), value.as_ref());
        let mut found = false;
        pairs.retain_mut(|(k, v)| {
            if k.as_str() != key {
                return true;
            }
            if found {
                return false;
            }
            found = true;
            *v = value.to_owned();
            true
        });
        if !found {
            pairs.push((key.to_owned(), value.to_owned()));
        }
    }

    let mut result = url.clone();
    if pairs.is_empty() {
        result.set_query(None);
    } else {
        result.query_pairs_mut().clear().extend_pairs(&pairs);
    }
    result
}
