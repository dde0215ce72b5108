use std::collections::{HashMap, HashSet, VecDeque};

use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use anyhow::anyhow;
use regex::Regex;
use tracing::debug;

use crate::utils::dp_cache::{DpCache, DpProblem, HashMapBackend};
use crate::utils::{parse_lines, solve_failed};

const TARGET: &str = "shiny gold";

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 7, tags = ["graph", "dp"])]
pub struct Solver;

/// Colour to the bags it directly contains, with counts
pub type Rules<'a> = HashMap<&'a str, Vec<(u64, &'a str)>>;

/// Total number of bags inside a bag of the given colour
struct BagsInside<'r, 'a> {
    rules: &'r Rules<'a>,
}

impl<'a> DpProblem<&'a str, u64> for BagsInside<'_, 'a> {
    fn deps(&self, colour: &&'a str) -> Vec<&'a str> {
        self.rules[colour].iter().map(|&(_, inner)| inner).collect()
    }

    fn compute(&self, colour: &&'a str, deps: Vec<u64>) -> u64 {
        self.rules[colour]
            .iter()
            .zip(deps)
            .map(|(&(count, _), inside)| count * (1 + inside))
            .sum()
    }
}

/// A colour on some containment cycle, if the rules have one
fn find_cycle<'a>(rules: &Rules<'a>) -> Option<&'a str> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Open,
        Done,
    }

    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(rules.len());
    for &root in rules.keys() {
        if marks.contains_key(root) {
            continue;
        }
        marks.insert(root, Mark::Open);
        // colour and index of the next child to visit
        let mut stack = vec![(root, 0usize)];
        while let Some((colour, next)) = stack.last_mut() {
            match rules[*colour].get(*next) {
                Some(&(_, child)) => {
                    *next += 1;
                    match marks.get(child) {
                        Some(Mark::Open) => return Some(child),
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(child, Mark::Open);
                            stack.push((child, 0));
                        }
                    }
                }
                None => {
                    marks.insert(*colour, Mark::Done);
                    stack.pop();
                }
            }
        }
    }
    None
}

impl AocParser for Solver {
    type SharedData<'a> = Rules<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let rule_re = Regex::new(r"^(.+?) bags contain (.+)\.$")
            .map_err(|e| ParseError::Other(e.to_string()))?;
        let content_re =
            Regex::new(r"^(\d+) (.+?) bags?$").map_err(|e| ParseError::Other(e.to_string()))?;

        let rules: Rules = parse_lines(input, |line| {
            let caps = rule_re
                .captures(line)
                .ok_or_else(|| anyhow!("expected `<colour> bags contain ...`, got {:?}", line))?;
            let (Some(outer), Some(contents)) = (caps.get(1), caps.get(2)) else {
                return Err(anyhow!("incomplete rule {:?}", line));
            };

            let inner = match contents.as_str() {
                "no other bags" => vec![],
                list => list
                    .split(", ")
                    .map(|item| {
                        let caps = content_re
                            .captures(item)
                            .ok_or_else(|| anyhow!("bad bag count {:?}", item))?;
                        let count: u64 = caps[1].parse()?;
                        let colour = caps.get(2).map_or("", |m| m.as_str());
                        Ok((count, colour))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?,
            };
            Ok((outer.as_str(), inner))
        })?
        .into_iter()
        .collect();

        if let Some(unknown) = rules
            .values()
            .flatten()
            .map(|&(_, colour)| colour)
            .find(|colour| !rules.contains_key(colour))
        {
            return Err(ParseError::MissingData(format!("no rule for {:?} bags", unknown)));
        }
        if let Some(colour) = find_cycle(&rules) {
            return Err(ParseError::InvalidFormat(format!(
                "{:?} bags end up inside themselves",
                colour
            )));
        }
        Ok(rules)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
        for (&outer, inner) in shared.iter() {
            for &(_, colour) in inner {
                parents.entry(colour).or_default().push(outer);
            }
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([TARGET]);
        while let Some(colour) = queue.pop_front() {
            for &parent in parents.get(colour).into_iter().flatten() {
                if seen.insert(parent) {
                    queue.push_back(parent);
                }
            }
        }
        debug!(containers = seen.len(), "walked containment graph");
        Ok(seen.len().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if !shared.contains_key(TARGET) {
            return Err(solve_failed(format!("no rule for {} bags", TARGET)));
        }
        let cache = DpCache::with_problem(HashMapBackend::new(), BagsInside { rules: shared });
        Ok(cache.get(&TARGET).to_string())
    }
}
