use bson::Bson;
use std::cmp::Ordering;

// 2^63, the first double above i64::MAX.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

fn as_num(x: &Bson) -> Option<Num> {
    match x {
        Bson::Int32(i) => Some(Num::Int(i64::from(*i))),
        Bson::Int64(i) => Some(Num::Int(*i)),
        Bson::Double(f) => Some(Num::Float(*f)),
        Bson::Decimal128(d) => {
            let s = d.to_string();
            Some(match s.parse::<i64>() {
                Ok(i) => Num::Int(i),
                Err(_) => Num::Float(s.parse::<f64>().unwrap_or(f64::NAN)),
            })
        }
        _ => None,
    }
}

// NaN sorts above every other number and equals itself; -0.0 equals 0.0.
fn cmp_float(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

// Exact: the integer is never rounded through f64.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() || f >= I64_BOUND {
        return Ordering::Less;
    }
    if f < -I64_BOUND {
        return Ordering::Greater;
    }
    let t = f.trunc();
    // t lies in [-2^63, 2^63) here, so the cast is exact
    #[allow(clippy::cast_possible_truncation)]
    let ti = t as i64;
    match i.cmp(&ti) {
        Ordering::Equal => cmp_float(t, f),
        ord => ord,
    }
}

fn cmp_num(a: Num, b: Num) -> Ordering {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x.cmp(&y),
        (Num::Int(x), Num::Float(y)) => cmp_int_float(x, y),
        (Num::Float(x), Num::Int(y)) => cmp_int_float(y, x).reverse(),
        (Num::Float(x), Num::Float(y)) => cmp_float(x, y),
    }
}

fn as_text(x: &Bson) -> Option<&str> {
    match x {
        Bson::String(s) | Bson::Symbol(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Natural order of two values. Numbers compare exactly across widths,
/// strings and symbols by content, booleans and datetimes by their own order,
/// anything else by type rank.
#[must_use]
pub fn compare_values(a: &Bson, b: &Bson) -> Ordering {
    if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
        return cmp_num(x, y);
    }
    if let (Some(x), Some(y)) = (as_text(a), as_text(b)) {
        return x.cmp(y);
    }
    match (a, b) {
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Equality used by `Eq`/`In` and key lookups: numeric across widths, exact otherwise.
#[must_use]
pub fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_num(a), as_num(b)) {
        (Some(x), Some(y)) => cmp_num(x, y) == Ordering::Equal,
        _ => a == b,
    }
}

/// Ordering of optional values; an absent value sorts before any present one.
#[must_use]
pub fn compare_optional(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => compare_values(x, y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn type_rank(v: &Bson) -> u8 {
    match v {
        Bson::Null | Bson::Undefined => 0,
        Bson::Boolean(_) => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::String(_) | Bson::Symbol(_) => 5,
        Bson::Array(_) => 6,
        Bson::Document(_) => 7,
        Bson::Binary(_) => 8,
        Bson::ObjectId(_) => 9,
        Bson::DateTime(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::Timestamp(_) => 12,
        Bson::MaxKey => 250,
        Bson::MinKey => 251,
        _ => 100,
    }
}
