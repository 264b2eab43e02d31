//! Random values for records created during a check run.

use rand::Rng;

/// Capitalized ASCII name: one uppercase letter followed by lowercase ones.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|i| {
            let letter = char::from(rng.gen_range(b'a'..=b'z'));
            if i == 0 {
                letter.to_ascii_uppercase()
            } else {
                letter
            }
        })
        .collect()
}

pub fn random_digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.gen_range(b'0'..=b'9')))
        .collect()
}
