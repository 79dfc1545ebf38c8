//! The color-controlled covering solver.
//!
//! This module implements Knuth's Algorithm 7.2.2.1C as a flat state
//! machine over the tables built by [`Table`]: the four-linked dance of
//! `cover`/`uncover` from Algorithm X, extended with the `purify`/
//! `unpurify` color controls, plus an optional *minimax* mode that trims
//! the search down to solutions whose largest option index is as small
//! as possible.

use std::ops::ControlFlow;

use tracing::{debug, info, trace};

use crate::error::Error;
use crate::stats::SearchStats;
use crate::table::Table;

/// Search modes for a [`Solver`].
#[derive(Debug, Default, Copy, Clone)]
pub struct Config {
    /// Visit only solutions whose largest option index is no greater than
    /// the smallest maximum seen so far. The last visited solution is then
    /// one whose maximum option index is globally minimal.
    pub minimax: bool,
    /// Retain one representative per minimum-maximum class: each visited
    /// solution strictly lowers the bound, and the search unwinds past the
    /// level that chose the maximal option. Only meaningful when `minimax`
    /// is set.
    pub minimax_single: bool,
    /// The heuristic of exercise 7.2.2.1–83: branch on the first item while
    /// at the root, and whenever a root-level option is abandoned and its
    /// last item is an uncolored secondary item, cover that item for good.
    /// Covering is permanent, so this mode can suppress solutions whose
    /// only support came through such an item.
    pub exercise83: bool,
}

/// How a search ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// Every solution was enumerated.
    Complete,
    /// The visitor broke off the search.
    Halted,
}

/// Visits all solutions to an exact cover problem with color controls.
///
/// Items and colors are referenced by name; an option is a sequence of
/// tokens of the form `name` or `name:color`, where coloring is permitted
/// on secondary items only. See the [crate-level documentation](`crate`)
/// for the problem statement and worked examples.
///
/// # Input contract
///
/// Every option must reference at least one primary item. The solver does
/// not check this requirement; an option of secondary items only would
/// never be committed and could mask solutions.
pub struct Solver<'i> {
    table: Table<'i>,
    config: Config,
    /// One entry per level of the partial solution: the node through which
    /// the level's option was reached. Once the level's alternatives are
    /// exhausted the entry degenerates to the branched item's header.
    state: Vec<usize>,
    /// No node past this index takes part in the search. Holds the table
    /// size (one past every node) until minimax tightens it.
    cutoff: usize,
    stats: SearchStats,
}

impl<'i> Solver<'i> {
    // Setup routines.

    /// Creates a solver for an XCC problem on the given primary and
    /// secondary items, with the default configuration.
    ///
    /// To specify the options to cover these items, use [`Self::add_option`].
    pub fn new(primary: &'i [&'i str], secondary: &'i [&'i str]) -> Result<Self, Error> {
        Self::with_config(primary, secondary, Config::default())
    }

    /// Creates a solver with an explicit search [`Config`].
    pub fn with_config(
        primary: &'i [&'i str],
        secondary: &'i [&'i str],
        config: Config,
    ) -> Result<Self, Error> {
        let table = Table::new(primary, secondary)?;
        let cutoff = table.size();
        Ok(Self {
            table,
            config,
            state: Vec::new(),
            cutoff,
            stats: SearchStats::default(),
        })
    }

    /// Appends an option to the problem.
    ///
    /// Each token is an item name, optionally suffixed with `:color` when
    /// the item is secondary. Options are tried in insertion order.
    pub fn add_option<T: AsRef<[&'i str]>>(&mut self, option: T) -> Result<(), Error> {
        self.table.add_option(option.as_ref())
    }

    /// Returns the counters of the most recent search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Gives access to the reporting controls; see [`SearchStats`].
    pub fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    // Algorithm C routines.

    /// Chooses the active primary item to branch on, by the minimum
    /// remaining values heuristic: an item whose vertical list is shortest,
    /// the earliest one in the horizontal list in case of a tie. An item
    /// with an empty list short-circuits the scan; the driver then has no
    /// option to try and backtracks at once.
    ///
    /// Returns `None` if every primary item is covered.
    fn choose_item(&self) -> Option<usize> {
        let t = &self.table;
        if t.rlink[0] == 0 {
            return None;
        }
        if self.config.exercise83 && self.state.is_empty() {
            return Some(1);
        }
        let mut best = 0;
        let mut theta = usize::MAX;
        let mut p = t.rlink[0];
        while p != 0 {
            let lambda = t.llen(p);
            if lambda < theta {
                if lambda == 0 {
                    return Some(p);
                }
                theta = lambda;
                best = p;
            }
            p = t.rlink[p];
        }
        Some(best)
    }

    /// Deletes the siblings of node `p` from their vertical lists, making
    /// the option containing `p` invisible to the rest of the search.
    ///
    /// A sibling whose color is negative was absorbed by a purification and
    /// is not linked anywhere; it stays untouched.
    fn hide(&mut self, p: usize) {
        if self.stats.debug && self.stats.verbosity > 1 {
            trace!(p, "hide");
        }
        let t = &mut self.table;
        let mut q = p + 1;
        while q != p {
            let x = t.top[q];
            if x <= 0 {
                // q is the trailing spacer; wrap to the option's first node.
                q = t.ulink[q];
            } else {
                if t.color[q] >= 0 {
                    let (u, d) = (t.ulink[q], t.dlink[q]);
                    t.dlink[u] = d;
                    t.ulink[d] = u;
                    t.top[x as usize] -= 1;
                }
                q += 1;
            }
        }
    }

    /// Puts the siblings of node `p` back into their vertical lists,
    /// exactly undoing [`Self::hide`].
    ///
    /// Under minimax a sibling's down link may still point at a node that
    /// the cutoff has since removed for good; the link is retargeted to the
    /// item header, making the sibling the new tail of its list.
    fn unhide(&mut self, p: usize) {
        if self.stats.debug && self.stats.verbosity > 1 {
            trace!(p, "unhide");
        }
        let cutoff = self.cutoff;
        let t = &mut self.table;
        let mut q = p - 1;
        while q != p {
            let x = t.top[q];
            if x <= 0 {
                // q is the leading spacer; wrap to the option's last node.
                q = t.dlink[q];
            } else {
                if t.color[q] >= 0 {
                    let mut d = t.dlink[q];
                    if d > cutoff {
                        d = x as usize;
                        t.dlink[q] = d;
                    }
                    let u = t.ulink[q];
                    t.dlink[u] = q;
                    t.ulink[d] = q;
                    t.top[x as usize] += 1;
                }
                q -= 1;
            }
        }
    }

    /// Covers item `i`: deletes it from the horizontal list of items that
    /// remain to be covered, and hides every option that contains it.
    fn cover(&mut self, i: usize) {
        if self.stats.debug && self.stats.verbosity > 1 {
            trace!(i, "cover");
        }
        let mut p = self.table.dlink[i];
        while p != i {
            self.hide(p);
            p = self.table.dlink[p];
        }
        let t = &mut self.table;
        let (l, r) = (t.llink[i], t.rlink[i]);
        t.rlink[l] = r;
        t.llink[r] = l;
    }

    /// Uncovers item `i`, exactly undoing [`Self::cover`]: restores the
    /// header to the horizontal list and unhides the item's options from
    /// the bottom up.
    fn uncover(&mut self, i: usize) {
        if self.stats.debug && self.stats.verbosity > 1 {
            trace!(i, "uncover");
        }
        if self.config.minimax {
            self.prune(i);
        }
        let t = &mut self.table;
        let (l, r) = (t.llink[i], t.rlink[i]);
        t.rlink[l] = i;
        t.llink[r] = i;
        let mut p = self.table.ulink[i];
        while p != i {
            self.unhide(p);
            p = self.table.ulink[p];
        }
    }

    /// Unlinks the tail of item `i`'s vertical list that lies past the
    /// cutoff. Nodes join a list in increasing index order, so everything
    /// past the cutoff forms a suffix.
    fn prune(&mut self, i: usize) {
        let cutoff = self.cutoff;
        let t = &mut self.table;
        let mut q = t.ulink[i];
        while q > cutoff {
            let u = t.ulink[q];
            t.dlink[u] = i;
            t.ulink[i] = u;
            t.top[i] -= 1;
            q = u;
        }
    }

    /// Commits secondary item `top[p]` to the color of node `p`: options
    /// of the same color are marked absorbed (color `−1`) and stay in the
    /// list, options of any other color are hidden. The chosen color id is
    /// parked in the header's color cell, where the solution reconstruction
    /// and later purifications of deeper levels can read it back.
    fn purify(&mut self, p: usize) {
        if self.stats.debug && self.stats.verbosity > 1 {
            trace!(p, "purify");
        }
        let c = self.table.color[p];
        let i = self.table.top[p] as usize;
        self.table.color[i] = c;
        let mut q = self.table.dlink[i];
        while q != i {
            if self.table.color[q] == c {
                self.table.color[q] = -1;
            } else {
                self.hide(q);
            }
            q = self.table.dlink[q];
        }
    }

    /// Exactly undoes [`Self::purify`], walking the list from the bottom
    /// up: absorbed nodes get their color back, hidden ones are unhidden.
    fn unpurify(&mut self, p: usize) {
        if self.stats.debug && self.stats.verbosity > 1 {
            trace!(p, "unpurify");
        }
        let c = self.table.color[p];
        let i = self.table.top[p] as usize;
        if self.config.minimax {
            self.prune(i);
        }
        let mut q = self.table.ulink[i];
        while q != i {
            if self.table.color[q] < 0 {
                self.table.color[q] = c;
            } else {
                self.unhide(q);
            }
            q = self.table.ulink[q];
        }
    }

    /// Commits one item of a chosen option: an uncolored node covers its
    /// item, a colored node purifies it, and an absorbed node needs no
    /// work at all.
    fn commit(&mut self, p: usize, j: usize) {
        match self.table.color[p] {
            0 => self.cover(j),
            c if c > 0 => self.purify(p),
            _ => {}
        }
    }

    /// The exact inverse of [`Self::commit`].
    fn uncommit(&mut self, p: usize, j: usize) {
        match self.table.color[p] {
            0 => self.uncover(j),
            c if c > 0 => self.unpurify(p),
            _ => {}
        }
    }

    /// Commits every item of the option containing node `x`, except the
    /// one the option was reached through, cyclically from left to right
    /// (part of step C5).
    fn commit_option(&mut self, x: usize) {
        let mut p = x + 1;
        while p != x {
            let j = self.table.top[p];
            if j <= 0 {
                p = self.table.ulink[p];
            } else {
                self.commit(p, j as usize);
                p += 1;
            }
        }
    }

    /// Uncommits the option containing node `x`, visiting the items in the
    /// opposite order of [`Self::commit_option`] (part of step C6).
    fn uncommit_option(&mut self, x: usize) {
        let mut p = x - 1;
        while p != x {
            let j = self.table.top[p];
            if j <= 0 {
                p = self.table.dlink[p];
            } else {
                self.uncommit(p, j as usize);
                p -= 1;
            }
        }
    }

    // The minimax controller.

    /// Tightens the cutoff after a visited solution and re-establishes the
    /// invariant that no active vertical list reaches past it.
    ///
    /// The candidate cutoff is the spacer at one end of the chosen option
    /// with the largest node index: past its end in plain minimax mode, or
    /// just before its start in single mode, which prunes that option
    /// itself and forces every later solution to a strictly smaller
    /// maximum. In single mode the search then unwinds to the level that
    /// chose the maximal option, discarding the pending alternatives of
    /// the levels above it; their nodes all lie past the new cutoff.
    fn update_cutoff(&mut self) {
        let (k_max, p_max) = self
            .state
            .iter()
            .enumerate()
            .max_by_key(|&(_, &p)| p)
            .map(|(k, &p)| (k, p))
            .expect("a solution has at least one option");
        let single = self.config.minimax_single;
        let spacer = if single {
            self.table.first_of_option(p_max) - 1
        } else {
            self.table.trailing_spacer(p_max)
        };
        if spacer < self.cutoff {
            self.cutoff = spacer;
            if self.stats.debug {
                debug!(cutoff = self.cutoff, "minimax: new cutoff");
            }
            // Later restoration walks start from the lists branched on by
            // the current solution; drop their pruned tails right away.
            for k in 0..self.state.len() {
                let i = self.table.top[self.state[k]] as usize;
                self.prune(i);
            }
        }
        if single {
            while self.state.len() > k_max {
                let x = self.state.pop().expect("unwinding a nonempty state");
                self.uncommit_option(x);
                self.uncover(self.table.top[x] as usize);
            }
        }
    }

    /// The permanent cover of exercise 7.2.2.1–83: once every solution
    /// through the abandoned root-level option `x` has been explored, an
    /// uncolored secondary item at the end of that option is covered for
    /// good. There is no matching uncover.
    fn exercise83_cover(&mut self, x: usize) {
        let last = self.table.trailing_spacer(x) - 1;
        let j = self.table.top[last] as usize;
        if j > self.table.n1 && self.table.color[last] == 0 {
            if self.stats.debug {
                debug!(item = self.table.name[j], "exercise 83: permanent cover");
            }
            self.cover(j);
        }
    }

    // The backtracking driver.

    /// Calls a closure on each solution to the declared problem, until the
    /// closure breaks or the search space is exhausted.
    ///
    /// Solutions arrive in the deterministic order induced by the MRV
    /// branching heuristic and the insertion order of options. After a
    /// completed plain search the tables are back in their post-build
    /// state and `solve` may be called again; a minimax search instead
    /// consumes the problem, because the cutoff machinery removes pruned
    /// options for good. A halted search leaves the tables exactly as they
    /// were at the moment of the halt.
    pub fn solve<F>(&mut self, mut visit: F) -> Status
    where
        F: FnMut(Solution<'_, 'i>) -> ControlFlow<()>,
    {
        // C1: start afresh; the tables themselves are ready as built.
        if self.stats.debug {
            debug!("C1. initialize");
        }
        self.state.clear();
        self.state.reserve(self.table.option_count);
        self.cutoff = self.table.size();
        self.stats.start(self.table.n + 1);
        if self.stats.debug {
            self.dump();
        }
        if self.stats.progress {
            self.show_progress();
        }

        'forward: loop {
            // C2–C5: descend, committing one option per level, until no
            // primary item remains or the branched item has no options.
            loop {
                if self.stats.debug {
                    debug!(level = self.state.len(), "C2. enter level");
                }
                if self.stats.enter_level(self.state.len()) {
                    self.show_progress();
                }
                let Some(i) = self.choose_item() else {
                    // C2: every primary item is covered; state holds a
                    // solution.
                    self.stats.solutions += 1;
                    if self.stats.debug {
                        debug!("C2. visit the solution");
                    }
                    if visit(Solution { solver: self, level: 0 }).is_break() {
                        if self.stats.debug {
                            debug!("C2. halting the search");
                        }
                        if self.stats.progress {
                            self.show_progress();
                        }
                        return Status::Halted;
                    }
                    if self.config.minimax {
                        self.update_cutoff();
                    }
                    break;
                };
                // C3, C4: branch on i and cover it.
                if self.stats.debug {
                    debug!(i, name = self.table.name[i], "C3/C4. choose and cover");
                }
                self.cover(i);
                let x = self.table.dlink[i];
                self.state.push(x);
                if x == i {
                    // The vertical list of i is empty; C5 would fall
                    // straight through to C7.
                    break;
                }
                // C5: try x, committing the rest of its option.
                self.commit_option(x);
            }

            // C6–C8: backtrack.
            loop {
                let Some(&x) = self.state.last() else {
                    // C8 at level 0: the search tree is exhausted.
                    if self.stats.debug {
                        debug!("C8. done");
                    }
                    if self.stats.progress {
                        self.show_progress();
                    }
                    return Status::Complete;
                };
                if x <= self.table.n {
                    // C7: x degenerated to the header of the item whose
                    // options ran out; undo C4 and leave the level.
                    if self.stats.debug {
                        debug!(i = x, "C7. backtrack");
                    }
                    self.state.pop();
                    self.uncover(x);
                    continue;
                }
                // C6: withdraw option x and move on to its successor.
                if self.stats.debug {
                    debug!(level = self.state.len() - 1, "C6. try again");
                }
                self.stats.nodes += 1;
                self.uncommit_option(x);
                if self.config.exercise83 && self.state.len() == 1 {
                    self.exercise83_cover(x);
                }
                let x = self.table.dlink[x];
                *self.state.last_mut().expect("state is nonempty") = x;
                if x > self.table.n {
                    // C5: the successor is a real option; commit it and
                    // enter the next level.
                    self.commit_option(x);
                    continue 'forward;
                }
                // The list is exhausted; the next turn performs C7.
            }
        }
    }

    // Solution reconstruction.

    /// Spells out the option containing node `x`, first item first,
    /// resolving the color of each secondary item.
    ///
    /// The resulting sequence replaces the previous contents of `result`.
    fn option_of(&self, x: usize, result: &mut Vec<(&'i str, Option<&'i str>)>) {
        result.clear();
        let mut q = self.table.first_of_option(x);
        while self.table.top[q] > 0 {
            let i = self.table.top[q] as usize;
            result.push((self.table.name[i], self.resolved_color(q)));
            q += 1;
        }
    }

    /// Returns the color name carried by node `q`, if any. A node marked
    /// absorbed reads the color back from its item header, where the
    /// purification that absorbed it parked the id.
    fn resolved_color(&self, q: usize) -> Option<&'i str> {
        let t = &self.table;
        match t.color[q] {
            0 => None,
            c if c > 0 => Some(t.colors[c as usize]),
            _ => {
                let i = t.top[q] as usize;
                Some(t.colors[t.color[i] as usize])
            }
        }
    }

    // Reporting.

    /// Logs the full tables; `verbosity > 2` territory.
    fn dump(&self) {
        use std::fmt::Write as _;
        let t = &self.table;
        let mut b = String::new();
        let _ = writeln!(b);
        let _ = writeln!(b, "name :  {:?}", t.name);
        let _ = writeln!(b, "llink:  {:?}", t.llink);
        let _ = writeln!(b, "rlink:  {:?}", t.rlink);
        let _ = writeln!(b, "top  :  {:?}", t.top);
        let _ = writeln!(b, "llen :  {:?}", &t.top[..=t.n]);
        let _ = writeln!(b, "ulink:  {:?}", t.ulink);
        let _ = writeln!(b, "dlink:  {:?}", t.dlink);
        let _ = writeln!(b, "color:  {:?}", t.color);
        let _ = write!(b, "colors:");
        for (id, name) in t.colors.iter().enumerate().skip(1) {
            let _ = write!(b, " {id}={name}");
        }
        let _ = writeln!(b);
        let _ = write!(b, "items: ");
        let mut i = t.rlink[0];
        while i != 0 {
            let _ = write!(b, " {}", t.name[i]);
            i = t.rlink[i];
        }
        let _ = writeln!(b);
        let mut option = Vec::new();
        for (level, &p) in self.state.iter().enumerate() {
            if p <= t.n {
                continue; // exhausted entry, no option attached
            }
            self.option_of(p, &mut option);
            let _ = write!(b, "  option: level={level}, p={p} (");
            for &(name, color) in &option {
                match color {
                    Some(color) => {
                        let _ = write!(b, " {name}:{color}");
                    }
                    None => {
                        let _ = write!(b, " {name}");
                    }
                }
            }
            let _ = writeln!(b, " )");
        }
        debug!("{b}");
    }

    /// Logs the current search path together with a crude completion
    /// estimate: the accumulated position of every level's option within
    /// its item's list, each weighted by the product of the list lengths
    /// above it.
    fn show_progress(&self) {
        use std::fmt::Write as _;
        if self.stats.debug && self.stats.verbosity > 0 {
            self.dump();
        }
        let t = &self.table;
        let mut est = 0.0f64;
        let mut tcum = 1u64;
        let mut b = String::new();
        let _ = writeln!(b);
        let _ = writeln!(
            b,
            "current level {} of max {}",
            self.state.len(),
            self.stats.max_level.map_or(-1, |max| max as i64)
        );
        let mut option = Vec::new();
        for &p in &self.state {
            if p <= t.n {
                let _ = writeln!(b, "  (exhausted {})", t.name[p]);
                continue;
            }
            self.option_of(p, &mut option);
            let _ = write!(b, " ");
            for &(name, color) in &option {
                match color {
                    Some(color) => {
                        let _ = write!(b, " {name}:{color}");
                    }
                    None => {
                        let _ = write!(b, " {name}");
                    }
                }
            }
            // Position of p within its item's current list.
            let i = t.top[p] as usize;
            let mut q = t.dlink[i];
            let mut k = 1u64;
            while q != p && q != i {
                q = t.dlink[q];
                k += 1;
            }
            if q != i {
                let _ = writeln!(b, " {} of {}", k, t.llen(i));
                tcum *= t.llen(i) as u64;
                est += (k - 1) as f64 / tcum as f64;
            } else {
                let _ = writeln!(b, " not in this list");
            }
        }
        est += 1.0 / (2 * tcum) as f64;
        let _ = writeln!(
            b,
            "solutions={}, nodes={}, est={est:.4}",
            self.stats.solutions, self.stats.nodes
        );
        info!("{b}");
    }
}

/// An iterator over the options of one solution to an XCC problem.
///
/// The solver hands an instance of this type to the visitor on every
/// solution; [`Self::next`] spells the chosen options out one at a time
/// into a caller-provided buffer, which keeps reconstruction free of
/// per-visit allocations.
pub struct Solution<'s, 'i: 's> {
    /// The solver whose state stack describes the covering.
    solver: &'s Solver<'i>,
    /// The level whose option the next call reconstructs.
    level: usize,
}

impl<'s, 'i> Solution<'s, 'i> {
    /// Places the items of the solution's next option into `result`, in
    /// option order, as `(item, color)` pairs. The color is `None` for
    /// primary items and for secondary items that no chosen option
    /// colored.
    ///
    /// Returns `false` and leaves the buffer untouched once all options
    /// have been enumerated.
    pub fn next(&mut self, result: &mut Vec<(&'i str, Option<&'i str>)>) -> bool {
        if let Some(&x) = self.solver.state.get(self.level) {
            self.level += 1;
            self.solver.option_of(x, result);
            true
        } else {
            false
        }
    }

    /// Returns the number of options in the solution.
    pub fn option_count(&self) -> usize {
        self.solver.state.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs the solver over the given problem and renders every solution
    /// as its options' token lists, in visit order.
    fn collect(
        primary: &[&str],
        secondary: &[&str],
        options: &[&[&str]],
        config: Config,
    ) -> Vec<Vec<Vec<String>>> {
        let mut solver = Solver::with_config(primary, secondary, config).unwrap();
        for option in options {
            solver.add_option(*option).unwrap();
        }
        let mut found = Vec::new();
        let mut buf = Vec::new();
        let status = solver.solve(|mut solution| {
            let mut rendered = Vec::with_capacity(solution.option_count());
            while solution.next(&mut buf) {
                rendered.push(
                    buf.iter()
                        .map(|&(name, color)| match color {
                            Some(color) => format!("{name}:{color}"),
                            None => name.to_string(),
                        })
                        .collect::<Vec<_>>(),
                );
            }
            found.push(rendered);
            ControlFlow::Continue(())
        });
        assert_eq!(status, Status::Complete);
        found
    }

    /// Owned form of an expected solution list, for `assert_eq!`.
    fn sols(expected: &[&[&[&str]]]) -> Vec<Vec<Vec<String>>> {
        expected
            .iter()
            .map(|solution| {
                solution
                    .iter()
                    .map(|option| option.iter().map(|token| token.to_string()).collect())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn knuth_toy_problem() {
        // The introductory exact cover problem of TAOCP 7.2.2.1: seven
        // items, six options, one solution.
        let found = collect(
            &["a", "b", "c", "d", "e", "f", "g"],
            &[],
            &[
                &["c", "e"],
                &["a", "d", "g"],
                &["b", "c", "f"],
                &["a", "d", "f"],
                &["b", "g"],
                &["d", "e", "g"],
            ],
            Config::default(),
        );
        assert_eq!(found, sols(&[&[&["a", "d", "f"], &["b", "g"], &["c", "e"]]]));
    }

    #[test]
    fn xcc_toy_problem() {
        // The toy XCC example of TAOCP 7.2.2.1–49.
        let found = collect(
            &["p", "q", "r"],
            &["x", "y"],
            &[
                &["p", "q", "x", "y:A"],
                &["p", "r", "x:A", "y"],
                &["p", "x:B"],
                &["q", "x:A"],
                &["r", "y:B"],
            ],
            Config::default(),
        );
        assert_eq!(found, sols(&[&[&["q", "x:A"], &["p", "r", "x:A", "y"]]]));
    }

    #[test]
    fn solutions_arrive_in_deterministic_order() {
        let options: &[&[&str]] = &[&["a", "b"], &["a"], &["b"]];
        let found = collect(&["a", "b"], &[], options, Config::default());
        assert_eq!(found, sols(&[&[&["a", "b"]], &[&["a"], &["b"]]]));
        // A second run replays the exact same sequence.
        assert_eq!(found, collect(&["a", "b"], &[], options, Config::default()));
    }

    #[test]
    fn search_statistics() {
        let mut solver = Solver::new(&["a", "b"], &[]).unwrap();
        solver.add_option(["a", "b"]).unwrap();
        solver.add_option(["a"]).unwrap();
        solver.add_option(["b"]).unwrap();
        solver.solve(|_| ControlFlow::Continue(()));
        let stats = solver.stats();
        assert_eq!(stats.solutions, 2);
        // Four level entries plus three retries.
        assert_eq!(stats.nodes, 7);
        assert_eq!(stats.levels, vec![1, 2, 1]);
        assert_eq!(stats.max_level, Some(2));
    }

    #[test]
    fn visitor_halts_the_search() {
        let mut solver = Solver::new(&["a", "b"], &[]).unwrap();
        solver.add_option(["a", "b"]).unwrap();
        solver.add_option(["a"]).unwrap();
        solver.add_option(["b"]).unwrap();
        let mut visits = 0;
        let status = solver.solve(|_| {
            visits += 1;
            ControlFlow::Break(())
        });
        assert_eq!(status, Status::Halted);
        assert_eq!(visits, 1);
        assert_eq!(solver.stats().solutions, 1);
    }

    #[test]
    fn rejects_unknown_item() {
        let mut solver = Solver::new(&["a"], &[]).unwrap();
        let err = solver.add_option(["a", "q"]).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownItemInOption {
                option: 0,
                token: "q".to_string(),
            }
        );
    }

    #[test]
    #[should_panic(expected = "option must have at least one item")]
    fn rejects_empty_option() {
        let mut solver = Solver::new(&["a"], &[]).unwrap();
        let empty: [&str; 0] = [];
        let _ = solver.add_option(empty);
    }

    /// Walks every vertical list in both directions and checks it against
    /// the recorded length.
    fn assert_lists_consistent(solver: &Solver<'_>) {
        let t = &solver.table;
        for i in 1..=t.n {
            let mut steps = 0;
            let mut q = t.dlink[i];
            while q != i {
                assert_eq!(t.top[q] as usize, i);
                assert_eq!(t.dlink[t.ulink[q]], q);
                assert_eq!(t.ulink[t.dlink[q]], q);
                q = t.dlink[q];
                steps += 1;
            }
            assert_eq!(steps, t.llen(i), "length mismatch for item {}", t.name[i]);
        }
    }

    #[test]
    fn vertical_lists_stay_consistent() {
        let mut solver = toy_xcc_solver();
        assert_lists_consistent(&solver);
        solver.cover(1);
        assert_lists_consistent(&solver);
        solver.cover(2);
        assert_lists_consistent(&solver);
        solver.uncover(2);
        solver.uncover(1);
        assert_lists_consistent(&solver);
    }

    #[test]
    fn minimax_earliest_option_wins() {
        // All three options solve the problem; minimax cuts the search off
        // after the first one, since no later option can beat its index.
        let found = collect(
            &["a"],
            &["x", "y", "z"],
            &[&["a", "x"], &["a", "y"], &["a", "z"]],
            Config {
                minimax: true,
                ..Config::default()
            },
        );
        assert_eq!(found, sols(&[&[&["a", "x"]]]));
    }

    #[test]
    fn minimax_keeps_solutions_of_equal_maximum() {
        let found = collect(
            &["a", "b"],
            &["x", "y", "z"],
            &[&["a", "x"], &["a", "y"], &["a", "z"], &["b", "y"]],
            Config {
                minimax: true,
                ..Config::default()
            },
        );
        assert_eq!(
            found,
            sols(&[&[&["b", "y"], &["a", "x"]], &[&["b", "y"], &["a", "z"]]])
        );
    }

    #[test]
    fn minimax_single_keeps_one_representative() {
        let found = collect(
            &["a", "b"],
            &["x", "y", "z"],
            &[&["a", "x"], &["a", "y"], &["a", "z"], &["b", "y"]],
            Config {
                minimax: true,
                minimax_single: true,
                ..Config::default()
            },
        );
        assert_eq!(found, sols(&[&[&["b", "y"], &["a", "x"]]]));
    }

    #[test]
    fn minimax_single_unwinds_to_the_maximal_level() {
        // The first solution's maximum is the option {b, y}; its leading
        // spacer becomes the cutoff, so neither it nor anything after it
        // can recur, and the remaining candidates are exhausted.
        let found = collect(
            &["a", "b"],
            &["x", "y", "z"],
            &[&["a", "x"], &["a", "y"], &["b", "y"], &["b", "x"]],
            Config {
                minimax: true,
                minimax_single: true,
                ..Config::default()
            },
        );
        assert_eq!(found, sols(&[&[&["a", "x"], &["b", "y"]]]));
    }

    #[test]
    fn minimax_regression_four_items() {
        // Regression scenario with twelve options over four primary items;
        // all three surviving solutions share the same maximal option
        // {c, d, z}, and arrive in this order.
        let found = collect(
            &["a", "b", "c", "d"],
            &["x", "y", "z"],
            &[
                &["a", "b", "x"],
                &["a", "b", "y:1"],
                &["b", "c", "y"],
                &["b", "c", "x"],
                &["a"],
                &["b"],
                &["c", "y:2"],
                &["c", "y:3"],
                &["c", "d", "z"],
                &["d", "y:3"],
                &["c", "d", "y"],
                &["c", "d", "x"],
            ],
            Config {
                minimax: true,
                ..Config::default()
            },
        );
        assert_eq!(
            found,
            sols(&[
                &[&["a", "b", "x"], &["c", "d", "z"]],
                &[&["a", "b", "y:1"], &["c", "d", "z"]],
                &[&["a"], &["c", "d", "z"], &["b"]],
            ])
        );
    }

    #[test]
    fn exercise83_covers_trailing_secondary_for_good() {
        let primary = ["a", "b"];
        let secondary = ["s", "t"];
        let options: &[&[&str]] = &[&["a", "s"], &["a", "t"], &["b", "t"], &["b", "s"]];
        // Without the heuristic both pairings are found.
        let found = collect(&primary, &secondary, options, Config::default());
        assert_eq!(
            found,
            sols(&[&[&["a", "s"], &["b", "t"]], &[&["a", "t"], &["b", "s"]]])
        );
        // With it, abandoning {a, s} at the root covers s permanently,
        // and the permanent cover takes {b, s}, hence the second pairing,
        // with it.
        let found = collect(
            &primary,
            &secondary,
            options,
            Config {
                exercise83: true,
                ..Config::default()
            },
        );
        assert_eq!(found, sols(&[&[&["a", "s"], &["b", "t"]]]));
    }

    #[test]
    fn exercise83_is_inert_without_trailing_secondaries() {
        let options: &[&[&str]] = &[&["a", "b"], &["a"], &["b"]];
        let plain = collect(&["a", "b"], &[], options, Config::default());
        let flagged = collect(
            &["a", "b"],
            &[],
            options,
            Config {
                exercise83: true,
                ..Config::default()
            },
        );
        assert_eq!(plain, flagged);
    }

    /// A copy of every link array, for byte-for-byte restoration checks.
    /// Header color cells are excluded: purification leaves its scratch
    /// there even after a fully undone search.
    fn snapshot(solver: &Solver<'_>) -> (Vec<usize>, Vec<usize>, Vec<isize>, Vec<usize>, Vec<usize>, Vec<isize>) {
        let t = &solver.table;
        (
            t.llink.clone(),
            t.rlink.clone(),
            t.top.clone(),
            t.ulink.clone(),
            t.dlink.clone(),
            t.color[t.n + 2..].to_vec(),
        )
    }

    fn toy_xcc_solver<'i>() -> Solver<'i> {
        let mut solver = Solver::new(&["p", "q", "r"], &["x", "y"]).unwrap();
        solver.add_option(["p", "q", "x", "y:A"]).unwrap();
        solver.add_option(["p", "r", "x:A", "y"]).unwrap();
        solver.add_option(["p", "x:B"]).unwrap();
        solver.add_option(["q", "x:A"]).unwrap();
        solver.add_option(["r", "y:B"]).unwrap();
        solver
    }

    #[test]
    fn cover_uncover_roundtrip() {
        let mut solver = toy_xcc_solver();
        let before = snapshot(&solver);
        solver.cover(1);
        solver.uncover(1);
        assert_eq!(snapshot(&solver), before);
        // Nested covers unwind just as cleanly.
        solver.cover(1);
        let mid = snapshot(&solver);
        solver.cover(2);
        solver.uncover(2);
        assert_eq!(snapshot(&solver), mid);
        solver.uncover(1);
        assert_eq!(snapshot(&solver), before);
    }

    #[test]
    fn purify_unpurify_roundtrip() {
        let mut solver = toy_xcc_solver();
        // Covering p hides the first three options, mimicking the state in
        // which the algorithm purifies: the purified node itself is no
        // longer in its item's list.
        solver.cover(1);
        let before = snapshot(&solver);
        // Node 14 is the x:A of {p, r, x:A, y}; purifying it absorbs the
        // matching x:A of {q, x:A} (node 21).
        solver.purify(14);
        assert_eq!(solver.table.color[21], -1);
        assert_eq!(solver.table.color[4], 1);
        solver.unpurify(14);
        assert_eq!(snapshot(&solver), before);
        // Node 18 is the x:B of {p, x:B}; purifying it hides {q, x:A}.
        solver.purify(18);
        assert_eq!(solver.table.llen(2), 0);
        solver.unpurify(18);
        assert_eq!(snapshot(&solver), before);
    }

    #[test]
    fn completed_search_restores_the_tables() {
        let mut solver = toy_xcc_solver();
        let before = snapshot(&solver);
        solver.solve(|_| ControlFlow::Continue(()));
        assert_eq!(snapshot(&solver), before);
        // And the restored tables support a full re-solve.
        let mut count = 0;
        solver.solve(|_| {
            count += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn minimax_restores_the_horizontal_lists() {
        let mut solver = Solver::with_config(
            &["a", "b"],
            &["x", "y", "z"],
            Config {
                minimax: true,
                ..Config::default()
            },
        )
        .unwrap();
        solver.add_option(["a", "x"]).unwrap();
        solver.add_option(["a", "y"]).unwrap();
        solver.add_option(["a", "z"]).unwrap();
        solver.add_option(["b", "y"]).unwrap();
        let (llink, rlink, ..) = snapshot(&solver);
        solver.solve(|_| ControlFlow::Continue(()));
        assert_eq!(solver.table.llink, llink);
        assert_eq!(solver.table.rlink, rlink);
    }
}
