//! Display conversions for PokeAPI's native units.
//!
//! Heights arrive in decimeters and weights in hectograms. Rounding to one
//! decimal is half-up on the value scaled to tenths, so `0.25` shows as
//! `0.3` (the std formatter would print `0.2`).

const INCHES_PER_DECIMETER: f64 = 3.937;
const HECTOGRAMS_PER_POUND: f64 = 4.536;

pub fn height_meters(decimeters: u16) -> String {
    format_tenths(f64::from(decimeters) / 10.0)
}

/// Feet and inches as `F'I"`, from the total inch count rounded once.
pub fn height_feet_inches(decimeters: u16) -> String {
    let total_inches = (f64::from(decimeters) * INCHES_PER_DECIMETER).round() as u32;
    let feet = total_inches / 12;
    let inches = total_inches % 12;
    format!("{feet}'{inches}\"")
}

pub fn weight_kg(hectograms: u16) -> String {
    format_tenths(f64::from(hectograms) / 10.0)
}

pub fn weight_lbs(hectograms: u16) -> String {
    format_tenths(f64::from(hectograms) / HECTOGRAMS_PER_POUND)
}

pub fn format_tenths(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_height() {
        assert_eq!(height_meters(7), "0.7");
        assert_eq!(height_meters(100), "10.0");
        assert_eq!(height_meters(0), "0.0");
    }

    #[test]
    fn feet_and_inches_round_the_total_once() {
        // 393.7 in rounds to 394 = 32 ft 10 in
        assert_eq!(height_feet_inches(100), "32'10\"");
        // 27.559 in rounds to 28 = 2 ft 4 in
        assert_eq!(height_feet_inches(7), "2'4\"");
        assert_eq!(height_feet_inches(0), "0'0\"");
    }

    #[test]
    fn feet_and_inches_never_shows_twelve_inches() {
        for dm in 0..=200u16 {
            let text = height_feet_inches(dm);
            let inches: u32 = text
                .split('\'')
                .nth(1)
                .and_then(|rest| rest.trim_end_matches('"').parse().ok())
                .unwrap();
            assert!(inches < 12, "{dm} dm rendered as {text}");
        }
    }

    #[test]
    fn converts_weight() {
        assert_eq!(weight_kg(100), "10.0");
        assert_eq!(weight_lbs(100), "22.0");
        assert_eq!(weight_kg(69), "6.9");
        assert_eq!(weight_lbs(69), "15.2");
    }

    #[test]
    fn ties_round_half_up() {
        assert_eq!(format_tenths(0.25), "0.3");
        assert_eq!(format_tenths(1.05), "1.1");
        assert_eq!(format_tenths(2.04), "2.0");
    }
}
