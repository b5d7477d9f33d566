//! Combination schedules for one Strassen level.
//!
//! A schedule receives the even-sized leading blocks of `C`, `A` and `B` and
//! fills `C` with their product using seven recursive multiplications
//! through [`Strassen::mul_rec`]. The engine applies the odd-dimension
//! patches afterwards; schedules never see them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::arith;
use crate::multiplier::MatError;
use crate::scratch::Temp;
use crate::strassen::Strassen;
use crate::view::{MatMut, MatRef, Window};

/// Half dimensions of a level: quadrants of `A` are `n x k`, of `B` are
/// `k x m`, of `C` are `n x m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halves {
    pub n: usize,
    pub k: usize,
    pub m: usize,
}

impl Halves {
    #[must_use]
    pub fn of(ar: usize, ac: usize, bc: usize) -> Self {
        Self {
            n: ar / 2,
            k: ac / 2,
            m: bc / 2,
        }
    }
}

/// Strategy for computing and combining the seven products of a level.
pub trait Schedule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Temporary matrices a single level holds at its peak when run
    /// sequentially.
    fn temporaries_per_level(&self) -> usize;

    /// Overwrite `c` (`2n x 2m`) with `a` (`2n x 2k`) times `b` (`2k x 2m`).
    fn combine(
        &self,
        engine: &Strassen,
        c: MatMut<'_>,
        a: MatRef<'_>,
        b: MatRef<'_>,
        halves: Halves,
    ) -> Result<(), MatError>;
}

/// Schedule selector used by configuration layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleKind {
    /// Strassen-Winograd ordering with two temporaries per level.
    #[default]
    Winograd,
    /// Seven products in their own temporaries, optionally in parallel.
    Independent,
}

impl ScheduleKind {
    pub const ALL: [ScheduleKind; 2] = [Self::Winograd, Self::Independent];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Winograd => "winograd",
            Self::Independent => "independent",
        }
    }

    #[must_use]
    pub fn build(self) -> Arc<dyn Schedule> {
        match self {
            Self::Winograd => Arc::new(WinogradSchedule),
            Self::Independent => Arc::new(IndependentProducts),
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown schedule '{s}' (expected winograd or independent)"))
    }
}

/// Strassen-Winograd variant: 7 products, 15 additions, two temporaries.
///
/// The first temporary is `n x max(k, m)` and is used as an `n x k` operand
/// and later as the `n x m` holder of `A11 * B11`; the second is `k x m`.
/// All other intermediate values live in the quadrants of `C`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WinogradSchedule;

impl Schedule for WinogradSchedule {
    fn name(&self) -> &'static str {
        "winograd"
    }

    fn temporaries_per_level(&self) -> usize {
        2
    }

    fn combine(
        &self,
        engine: &Strassen,
        mut c: MatMut<'_>,
        a: MatRef<'_>,
        b: MatRef<'_>,
        halves: Halves,
    ) -> Result<(), MatError> {
        let Halves { n, k, m } = halves;
        let [a11, a12, a21, a22] = a.quadrants(n, k);
        let [b11, b12, b21, b22] = b.quadrants(k, m);
        let [q11, q12, q21, q22] = Window::quadrants(n, m);

        let mut wide = engine.temp(n, k.max(m))?;
        let mut wkm = engine.temp(k, m)?;

        // C21 = (A11 - A21)(B22 - B12)
        arith::sub(wkm.as_mut(), b22, b12);
        arith::sub(wide.view_mut(0, 0, n, k), a11, a21);
        engine.mul_rec(c.in_window_mut(q21), wide.view(0, 0, n, k), wkm.as_ref())?;

        // C22 = (A21 + A22)(B12 - B11)
        arith::add(wide.view_mut(0, 0, n, k), a21, a22);
        arith::sub(wkm.as_mut(), b12, b11);
        engine.mul_rec(c.in_window_mut(q22), wide.view(0, 0, n, k), wkm.as_ref())?;

        // C11 = (A21 + A22 - A11)(B22 - B12 + B11)
        wkm.as_mut().rsub_assign(b22);
        wide.view_mut(0, 0, n, k).sub_assign(a11);
        engine.mul_rec(c.in_window_mut(q11), wide.view(0, 0, n, k), wkm.as_ref())?;

        // C12 = (A12 - A21 - A22 + A11) B22
        wide.view_mut(0, 0, n, k).rsub_assign(a12);
        engine.mul_rec(c.in_window_mut(q12), wide.view(0, 0, n, k), b22)?;
        c.add_assign_within(q12, q22);

        // wide = A11 B11, added to C11 now and again at the end
        engine.mul_rec(wide.view_mut(0, 0, n, m), a11, b11)?;
        c.in_window_mut(q11).add_assign(wide.view(0, 0, n, m));
        c.add_assign_within(q12, q11);
        c.add_assign_within(q11, q21);

        // C21 = C11 - A22 (B22 - B12 + B11 - B21)
        wkm.as_mut().sub_assign(b21);
        engine.mul_rec(c.in_window_mut(q21), a22, wkm.as_ref())?;
        c.rsub_assign_within(q21, q11);
        c.add_assign_within(q22, q11);

        // C11 = A12 B21 + A11 B11
        engine.mul_rec(c.in_window_mut(q11), a12, b21)?;
        c.in_window_mut(q11).add_assign(wide.view(0, 0, n, m));
        Ok(())
    }
}

/// Classic Strassen formulation: `P1..P7` are each computed into their own
/// temporary, then the four quadrants of `C` are assembled.
///
/// When the quadrant area reaches the engine's parallel threshold the seven
/// products run on the rayon pool. `C` is only written after all of them
/// have completed.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndependentProducts;

#[derive(Clone, Copy)]
enum Term<'a> {
    View(MatRef<'a>),
    Sum(MatRef<'a>, MatRef<'a>),
    Diff(MatRef<'a>, MatRef<'a>),
}

enum Operand<'a, 's> {
    Borrowed(MatRef<'a>),
    Owned(Temp<'s>),
}

impl Operand<'_, '_> {
    fn view(&self) -> MatRef<'_> {
        match self {
            Operand::Borrowed(r) => *r,
            Operand::Owned(t) => t.as_ref(),
        }
    }
}

impl<'a> Term<'a> {
    fn materialize<'s>(self, engine: &'s Strassen) -> Result<Operand<'a, 's>, MatError> {
        match self {
            Term::View(x) => Ok(Operand::Borrowed(x)),
            Term::Sum(x, y) => {
                let mut t = engine.temp(x.rows(), x.cols())?;
                arith::add(t.as_mut(), x, y);
                Ok(Operand::Owned(t))
            }
            Term::Diff(x, y) => {
                let mut t = engine.temp(x.rows(), x.cols())?;
                arith::sub(t.as_mut(), x, y);
                Ok(Operand::Owned(t))
            }
        }
    }
}

fn product<'s>(
    engine: &'s Strassen,
    lhs: Term<'_>,
    rhs: Term<'_>,
    rows: usize,
    cols: usize,
) -> Result<Temp<'s>, MatError> {
    let lhs = lhs.materialize(engine)?;
    let rhs = rhs.materialize(engine)?;
    let mut p = engine.temp(rows, cols)?;
    engine.mul_rec(p.as_mut(), lhs.view(), rhs.view())?;
    Ok(p)
}

impl Schedule for IndependentProducts {
    fn name(&self) -> &'static str {
        "independent"
    }

    fn temporaries_per_level(&self) -> usize {
        9
    }

    fn combine(
        &self,
        engine: &Strassen,
        mut c: MatMut<'_>,
        a: MatRef<'_>,
        b: MatRef<'_>,
        halves: Halves,
    ) -> Result<(), MatError> {
        use Term::{Diff, Sum, View};

        let Halves { n, k, m } = halves;
        let [a11, a12, a21, a22] = a.quadrants(n, k);
        let [b11, b12, b21, b22] = b.quadrants(k, m);
        let [q11, q12, q21, q22] = Window::quadrants(n, m);

        let terms = [
            (Sum(a11, a22), Sum(b11, b22)),
            (Sum(a21, a22), View(b11)),
            (View(a11), Diff(b12, b22)),
            (View(a22), Diff(b21, b11)),
            (Sum(a11, a12), View(b22)),
            (Diff(a21, a11), Sum(b11, b12)),
            (Diff(a12, a22), Sum(b21, b22)),
        ];

        let products: Vec<Temp<'_>> = if n * m >= engine.options().parallel_threshold {
            terms
                .into_par_iter()
                .map(|(x, y)| product(engine, x, y, n, m))
                .collect::<Result<_, _>>()?
        } else {
            terms
                .into_iter()
                .map(|(x, y)| product(engine, x, y, n, m))
                .collect::<Result<_, _>>()?
        };
        let p = |i: usize| products[i].as_ref();

        let mut c11 = c.in_window_mut(q11);
        c11.copy_from(p(0));
        c11.add_assign(p(3));
        c11.sub_assign(p(4));
        c11.add_assign(p(6));

        let mut c12 = c.in_window_mut(q12);
        c12.copy_from(p(2));
        c12.add_assign(p(4));

        let mut c21 = c.in_window_mut(q21);
        c21.copy_from(p(1));
        c21.add_assign(p(3));

        let mut c22 = c.in_window_mut(q22);
        c22.copy_from(p(0));
        c22.sub_assign(p(1));
        c22.add_assign(p(2));
        c22.add_assign(p(5));
        Ok(())
    }
}
