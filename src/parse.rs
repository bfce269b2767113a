//! Parsing cobar expressions.
//!
//! The grammar matches what the REPL prints back out: an expression is a
//! `+`-separated list of terms, a term is an optional rational weight
//! followed by `*` and a generator, and a generator is an optional V-basis
//! coefficient monomial followed by a `[ t.. | t.. ]` word (either part may
//! be omitted, but not both). Monomials are `1` or factors like `v1 v2^3`;
//! rationals are `-3` or `5/2`. There is no `-` between terms: negative
//! weights are written as `+ -1 * ...`.

use anyhow::{anyhow, ensure, Context};
use nom::{
    branch::alt,
    character::complete::{char, digit1, space0},
    combinator::{map, map_res, opt},
    error::{ParseError, VerboseError},
    multi::{many1, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
    IResult as IResultBase, Parser,
};
use num_bigint::BigInt;
use num_traits::One;
use std::str::FromStr;

use crate::basis::{Basis, T, V};
use crate::cobar::CobarGenerator;
use crate::linear_combination::LinearCombination;
use crate::monomial::Monomial;
use crate::rational::Q;

type IResult<I, O> = IResultBase<I, O, VerboseError<I>>;

/// Pad both ends with whitespace
fn space<'a, O, E: ParseError<&'a str>, F: Parser<&'a str, O, E>>(
    f: F,
) -> impl FnMut(&'a str) -> IResultBase<&'a str, O, E> {
    delimited(space0, f, space0)
}

fn rational(i: &str) -> IResult<&str, Q> {
    let integer = |i| map_res(digit1, BigInt::from_str)(i);
    map(
        pair(
            pair(opt(char('-')), integer),
            opt(preceded(space(char('/')), integer)),
        ),
        |((minus, numer), denom)| {
            let numer = if minus.is_some() { -numer } else { numer };
            Q::new(numer, denom.unwrap_or_else(BigInt::one))
        },
    )(i)
}

/// A single `letter degree [^ exponent]` factor, e.g. `t2^4`.
fn factor<B: Basis>(i: &str) -> IResult<&str, Monomial<B>> {
    map(
        preceded(
            char(B::LETTER),
            pair(
                map_res(digit1, usize::from_str),
                opt(preceded(char('^'), map_res(digit1, u32::from_str))),
            ),
        ),
        |(degree, exponent)| Monomial::generator(degree, exponent.unwrap_or(1)),
    )(i)
}

fn monomial<B: Basis>(i: &str) -> IResult<&str, Monomial<B>> {
    alt((
        map(char('1'), |_| Monomial::one()),
        map(many1(space(factor::<B>)), |factors| {
            factors.iter().fold(Monomial::one(), |acc, f| &acc * f)
        }),
    ))(i)
}

fn word(i: &str) -> IResult<&str, Vec<Monomial<T>>> {
    delimited(
        space(char('[')),
        separated_list0(char('|'), space(monomial::<T>)),
        space(char(']')),
    )(i)
}

fn generator(i: &str) -> IResult<&str, CobarGenerator<V>> {
    alt((
        map(
            pair(opt(space(monomial::<V>)), word),
            |(coeff, entries)| CobarGenerator::new(coeff.unwrap_or_else(Monomial::one), entries),
        ),
        map(space(monomial::<V>), |coeff| {
            CobarGenerator::new(coeff, Vec::new())
        }),
    ))(i)
}

fn term(i: &str) -> IResult<&str, (Q, CobarGenerator<V>)> {
    map(
        pair(opt(terminated(rational, space(char('*')))), generator),
        |(weight, generator)| (weight.unwrap_or_else(Q::one), generator),
    )(i)
}

fn expression(i: &str) -> IResult<&str, Vec<(Q, CobarGenerator<V>)>> {
    separated_list1(char('+'), space(term))(i)
}

fn convert_error(i: &str) -> impl FnOnce(nom::Err<VerboseError<&str>>) -> anyhow::Error + '_ {
    move |err| {
        anyhow!(match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => nom::error::convert_error(i, e),
            _ => format!("{err:#}"),
        })
    }
}

/// Parses an expression into a V-basis combination, accumulating repeated
/// generators.
pub fn cobar_expression(i: &str) -> anyhow::Result<LinearCombination<CobarGenerator<V>>> {
    let (rest, terms) = expression(i)
        .map_err(convert_error(i))
        .with_context(|| format!("Error when parsing cobar expression {i}"))?;
    ensure!(
        rest.is_empty(),
        "Failed to consume all of input. Remaining: '{rest}'"
    );
    let mut ret = LinearCombination::new();
    for (weight, generator) in terms {
        ret.add_term(generator, weight);
    }
    Ok(ret)
}
