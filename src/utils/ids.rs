use rand::distributions::Alphanumeric;
use rand::Rng;

const SUFFIX_LEN: usize = 9;

/// Short lowercase alphanumeric tag used to keep generated ids distinct.
pub fn unique_suffix<R: Rng>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| (rng.sample(Alphanumeric) as char).to_ascii_lowercase())
        .collect()
}

/// Turn a habit title into an id: "Drink Water" -> "drink_water_<suffix>"
pub fn habit_id<R: Rng>(title: &str, rng: &mut R) -> String {
    let slug: String = title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        format!("habit_{}", unique_suffix(rng))
    } else {
        format!("{}_{}", slug, unique_suffix(rng))
    }
}
