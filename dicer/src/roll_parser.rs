use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map_res, opt},
    sequence::{delimited, preceded},
};

use crate::{
    error::{DicerError, Result},
    rules::dice::DieSpec,
};

/// Parses `NdF` notation such as `2d6` or `d20`. A missing count means one
/// die. The result is validated like any other spec.
pub fn parse_dice(input: &str) -> Result<DieSpec> {
    let res = all_consuming(delimited(space0, die_spec, space0)).parse(input);

    match res {
        Ok((_, (count, faces))) => DieSpec::new(count, faces),
        Err(_) => Err(DicerError::Notation(input.to_string())),
    }
}

fn die_spec(input: &str) -> IResult<&str, (u32, u32)> {
    let (input, (count, faces)) = (
        opt(number),
        preceded(alt((char('d'), char('D'))), number),
    )
        .parse(input)?;

    Ok((input, (count.unwrap_or(1), faces)))
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>()).parse(input)
}

impl std::str::FromStr for DieSpec {
    type Err = DicerError;

    fn from_str(s: &str) -> Result<Self> {
        parse_dice(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse_dice("2d6").unwrap(), DieSpec { count: 2, faces: 6 });
        assert_eq!(parse_dice(" 10D100 ").unwrap(), DieSpec { count: 10, faces: 100 });
    }

    #[test]
    fn test_parse_implicit_count() {
        assert_eq!(parse_dice("d20").unwrap(), DieSpec { count: 1, faces: 20 });
        let spec: DieSpec = "d4".parse().unwrap();
        assert_eq!(spec.faces, 4);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "2d", "d", "2x6", "2d6+3", "-1d6", "2 d6"] {
            assert!(
                matches!(parse_dice(input), Err(DicerError::Notation(_))),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_parse_validates_ranges() {
        assert!(parse_dice("0d6").unwrap_err().is_invalid_configuration());
        assert!(parse_dice("3d1").unwrap_err().is_invalid_configuration());
    }
}
