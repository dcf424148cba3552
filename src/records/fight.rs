use super::FighterId;

/// One finished bout as listed on a fighter's own profile, with the opponent
/// already resolved to a canonical id. Fields are trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bout {
    pub opponent: FighterId,
    /// Outcome from the profile owner's point of view (`win`, `loss`, ...)
    pub result: String,
    pub method: String,
    pub round: String,
    pub time: String,
    pub date: String,
}

impl Bout {
    pub fn new(
        opponent: FighterId,
        result: &str,
        method: &str,
        round: &str,
        time: &str,
        date: &str,
    ) -> Self {
        Self {
            opponent,
            result: result.trim().to_string(),
            method: method.trim().to_string(),
            round: round.trim().to_string(),
            time: time.trim().to_string(),
            date: date.trim().to_string(),
        }
    }
}

/// Identity of a fight: the unordered participant pair plus the date.
///
/// The pair is stored sorted, so both participants' pages produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FightKey {
    first: FighterId,
    second: FighterId,
    date: String,
}

impl FightKey {
    pub fn new(a: &FighterId, b: &FighterId, date: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.clone(),
            second: second.clone(),
            date: date.trim().to_string(),
        }
    }
}

/// One row of the fight dataset.
///
/// `fighter_a` sorts before `fighter_b`; `result` is from `fighter_a`'s side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FightRecord {
    pub fighter_a: FighterId,
    pub fighter_b: FighterId,
    pub result: String,
    pub method: String,
    pub round: String,
    pub time: String,
    pub date: String,
}

impl FightRecord {
    /// Builds the canonical row for a bout found on `owner`'s profile
    pub fn from_bout(owner: &FighterId, bout: &Bout) -> Self {
        let owner_first = *owner <= bout.opponent;
        let (fighter_a, fighter_b, result) = if owner_first {
            (owner.clone(), bout.opponent.clone(), bout.result.clone())
        } else {
            (bout.opponent.clone(), owner.clone(), invert_result(&bout.result))
        };

        Self {
            fighter_a,
            fighter_b,
            result,
            method: bout.method.clone(),
            round: bout.round.clone(),
            time: bout.time.clone(),
            date: bout.date.clone(),
        }
    }

    pub fn key(&self) -> FightKey {
        FightKey::new(&self.fighter_a, &self.fighter_b, &self.date)
    }
}

/// Swaps `win` and `loss`, keeping the capitalisation style. Anything else
/// (`draw`, `NC`, ...) reads the same from both sides.
fn invert_result(result: &str) -> String {
    let swapped = match result.to_ascii_lowercase().as_str() {
        "win" => "loss",
        "loss" => "win",
        _ => return result.to_string(),
    };

    if result.chars().all(|c| c.is_ascii_uppercase()) {
        swapped.to_ascii_uppercase()
    } else if result.starts_with(|c: char| c.is_ascii_uppercase()) {
        let mut out = swapped[..1].to_ascii_uppercase();
        out.push_str(&swapped[1..]);
        out
    } else {
        swapped.to_string()
    }
}
