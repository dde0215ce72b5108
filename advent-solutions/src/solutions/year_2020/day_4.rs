use std::collections::HashMap;

use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::blank_line_groups;

const REQUIRED: [&str; 7] = ["byr", "iyr", "eyr", "hgt", "hcl", "ecl", "pid"];
const EYE_COLOURS: [&str; 7] = ["amb", "blu", "brn", "gry", "grn", "hzl", "oth"];

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 4, tags = ["parsing", "validation"])]
pub struct Solver;

pub type Passport<'a> = HashMap<&'a str, &'a str>;

fn has_required_fields(passport: &Passport) -> bool {
    REQUIRED.iter().all(|key| passport.contains_key(key))
}

fn year_in(value: &str, lo: u32, hi: u32) -> bool {
    value.len() == 4 && value.parse().is_ok_and(|y: u32| (lo..=hi).contains(&y))
}

fn valid_height(value: &str) -> bool {
    let in_range = |num: &str, lo: u32, hi: u32| num.parse().is_ok_and(|h: u32| (lo..=hi).contains(&h));
    if let Some(cm) = value.strip_suffix("cm") {
        in_range(cm, 150, 193)
    } else if let Some(inches) = value.strip_suffix("in") {
        in_range(inches, 59, 76)
    } else {
        false
    }
}

fn valid_hair(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    })
}

fn valid_field(key: &str, value: &str) -> bool {
    match key {
        "byr" => year_in(value, 1920, 2002),
        "iyr" => year_in(value, 2010, 2020),
        "eyr" => year_in(value, 2020, 2030),
        "hgt" => valid_height(value),
        "hcl" => valid_hair(value),
        "ecl" => EYE_COLOURS.contains(&value),
        "pid" => value.len() == 9 && value.bytes().all(|b| b.is_ascii_digit()),
        _ => true,
    }
}

fn is_valid(passport: &Passport) -> bool {
    has_required_fields(passport) && passport.iter().all(|(key, value)| valid_field(key, value))
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Passport<'a>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        blank_line_groups(input)
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .flat_map(|(line_no, line)| {
                        line.split_whitespace().map(move |field| (line_no, field))
                    })
                    .map(|(line_no, field)| {
                        field.split_once(':').ok_or_else(|| {
                            ParseError::InvalidFormat(format!(
                                "(line {}) expected key:value, got {:?}",
                                line_no, field
                            ))
                        })
                    })
                    .collect::<Result<Passport, ParseError>>()
            })
            .collect()
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .iter()
            .filter(|p| has_required_fields(p))
            .count()
            .to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().filter(|p| is_valid(p)).count().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_solver::Solver as _;

    const EXAMPLE: &str = "\
ecl:gry pid:860033327 eyr:2020 hcl:#fffffd
byr:1937 iyr:2017 cid:147 hgt:183cm

iyr:2013 ecl:amb cid:350 eyr:2023 pid:028048884
hcl:#cfa07d byr:1929

hcl:#ae17e1 iyr:2013
eyr:2024
ecl:brn pid:760753108 byr:1931
hgt:179cm

hcl:#cfa07d eyr:2025 pid:166559648
iyr:2011 ecl:brn hgt:59in
";

    const INVALID: &str = "\
eyr:1972 cid:100
hcl:#18171d ecl:amb hgt:170 pid:186cm iyr:2018 byr:1926

iyr:2019
hcl:#602927 eyr:1967 hgt:170cm
ecl:grn pid:012533040 byr:1946

hcl:dab227 iyr:2012
ecl:brn hgt:182cm pid:021572410 eyr:2020 byr:1992 cid:277

hgt:59cm ecl:zzz
eyr:2038 hcl:74454a iyr:2023
pid:3556412378 byr:2007
";

    const VALID: &str = "\
pid:087499704 hgt:74in ecl:grn iyr:2012 eyr:2030 byr:1980
hcl:#623a2f

eyr:2029 ecl:blu cid:129 byr:1989
iyr:2014 pid:896056539 hcl:#a97842 hgt:165cm

hcl:#888785
hgt:164cm byr:2001 iyr:2015 cid:88
pid:545766238 ecl:hzl
eyr:2022

iyr:2010 hgt:158cm hcl:#b6652a ecl:blu byr:1944 eyr:2021 pid:093154719
";

    fn solve(input: &str, part: u8) -> String {
        let mut shared = Solver::parse(input).unwrap();
        Solver::solve_part(&mut shared, part).unwrap()
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(solve(EXAMPLE, 1), "2");
    }

    #[test]
    fn test_strict_validation() {
        assert_eq!(solve(INVALID, 2), "0");
        assert_eq!(solve(VALID, 2), "4");
    }

    #[test]
    fn test_field_rules() {
        assert!(valid_field("byr", "2002"));
        assert!(!valid_field("byr", "2003"));
        assert!(valid_field("hgt", "60in"));
        assert!(valid_field("hgt", "190cm"));
        assert!(!valid_field("hgt", "190in"));
        assert!(!valid_field("hgt", "190"));
        assert!(valid_field("hcl", "#123abc"));
        assert!(!valid_field("hcl", "#123abz"));
        assert!(!valid_field("hcl", "123abc"));
        assert!(valid_field("ecl", "brn"));
        assert!(!valid_field("ecl", "wat"));
        assert!(!valid_field("ecl", "bl"));
        assert!(valid_field("pid", "000000001"));
        assert!(!valid_field("pid", "0123456789"));
    }

    #[test]
    fn test_malformed_field() {
        assert!(matches!(
            Solver::parse("ecl:gry\n\nbyr:1937\niyr:2017 ecl gry"),
            Err(ParseError::InvalidFormat(msg)) if msg.starts_with("(line 4)")
        ));
    }
}
