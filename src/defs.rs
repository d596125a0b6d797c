//! Standard dice, built once and shared by cloning.

use std::sync::LazyLock;

use crate::{Die, Pool};

macro_rules! standard_dice {
    ($($stat:ident, $func:ident => $faces:expr;)*) => {
        $(
            pub static $stat: LazyLock<Die> = LazyLock::new(|| Die::numeric($faces));

            #[must_use]
            pub fn $func() -> Die {
                $stat.clone()
            }
        )*
    };
}

standard_dice! {
    D2, d2 => 2;
    D3, d3 => 3;
    D4, d4 => 4;
    D6, d6 => 6;
    D8, d8 => 8;
    D10, d10 => 10;
    D12, d12 => 12;
    D20, d20 => 20;
    D100, d100 => 100;
}

/// Fudge die: `-1`, `0` and `+1`.
pub static DF: LazyLock<Die> = LazyLock::new(|| Die::uniform(-1..=1));

#[must_use]
pub fn df() -> Die {
    DF.clone()
}

/// `n` copies of `die`, as in `4d6`.
#[must_use]
pub fn nd(n: usize, die: &Die) -> Pool {
    Pool::repeat(n, die.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Count;

    #[test]
    fn standard_faces() {
        assert_eq!(d20().len(), 20);
        assert_eq!(d100().max_value(), Some(&100));
        assert_eq!(df().values(), &[-1, 0, 1]);
    }

    #[test]
    fn four_d6_drop_lowest() {
        let stat = nd(4, &d6()).highest(3).unwrap();
        assert_eq!(*stat.total(), Count::from(1296u32));
        assert_eq!(stat.count_of(&18), Count::from(21u32));
        assert_eq!(stat.count_of(&3), Count::from(1u32));
    }
}
