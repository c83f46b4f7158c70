//! Random password generation over the character classes the strength
//! scorer knows about.

use std::collections::BTreeSet;

use rand::rng;
use rand::seq::{IndexedRandom, SliceRandom};

use quiz_core::password::CharClass;

use crate::error::PasswordError;

/// Generate a random password of `length` drawn from `classes`.
///
/// Each selected class contributes at least one character; the rest are
/// drawn uniformly from the union of the selected alphabets, and the whole
/// result is shuffled so the guaranteed picks do not cluster at the front.
///
/// # Errors
///
/// Returns `PasswordError::NoClassSelected` when `classes` is empty and
/// `PasswordError::LengthTooShort` when `length` cannot hold one character
/// per selected class.
pub fn generate(length: usize, classes: &BTreeSet<CharClass>) -> Result<String, PasswordError> {
    if classes.is_empty() {
        return Err(PasswordError::NoClassSelected);
    }
    if length < classes.len() {
        return Err(PasswordError::LengthTooShort {
            length,
            classes: classes.len(),
        });
    }

    let union: Vec<char> = classes.iter().flat_map(|class| class.alphabet().chars()).collect();
    let mut rng = rng();

    let mut chars: Vec<char> = Vec::with_capacity(length);
    for class in classes {
        let alphabet: Vec<char> = class.alphabet().chars().collect();
        // Non-empty by construction.
        if let Some(c) = alphabet.choose(&mut rng) {
            chars.push(*c);
        }
    }
    while chars.len() < length {
        if let Some(c) = union.choose(&mut rng) {
            chars.push(*c);
        }
    }

    chars.shuffle(&mut rng);
    Ok(chars.into_iter().collect())
}
