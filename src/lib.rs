//! This crate solves the _exact covering with colors_ (XCC) problem by the
//! dancing links technique, with an optional _minimax_ twist that steers the
//! search toward solutions built from the earliest available options.
//!
//! Suppose we're given a collection of _options_, each of which is a set of
//! _items_; the _exact cover_ problem is to find a subcollection of options
//! such that each item occurs in exactly one of them. D. E. Knuth's paper
//! "Dancing Links", [arXiv:cs/0011047][dl] [cs.DS] (2000), describes a
//! deceptively simple technique for deleting and restoring the nodes of a
//! doubly linked list, and a backtracking scheme built on it, called
//! _Algorithm X_, that visits all exact covers in a depth-first manner.
//!
//! The XCC generalization splits the items into two categories. _Primary_
//! items must be covered exactly once, as before. _Secondary_ items may be
//! covered at most once, unless the options reaching them agree on a
//! _color_, in which case any number of same-colored coverings coexist.
//! Knuth's Algorithm C, from Section 7.2.2.1 of [_The Art of Computer
//! Programming_ **4B** (2022)][taocp4b], Part 2, pages 87–91, extends
//! Algorithm X with exactly this color control, and it is the algorithm
//! implemented here: a flat arena of integer arrays threaded by cyclic
//! doubly linked lists, where covering, uncovering, and color purification
//! are all in-place link surgery.
//!
//! Items are referenced by name, and a color is attached to an item
//! reference by suffixing it with `:color`, so an option is a sequence of
//! tokens like `["p", "x:A"]`. Solutions are handed to a visitor callback
//! as they are found; the visitor steers the search through its
//! [`ControlFlow`] result.
//!
//! Beyond plain enumeration, [`Config`] enables two whole-search
//! optimization modes:
//! - **minimax** restricts the enumeration to solutions whose largest
//!   option index is no greater than the smallest such maximum found so
//!   far. The last visited solution then attains the globally minimal
//!   maximum, which is useful when options are ordered by preference and
//!   the worst choice made is to be minimized.
//! - **minimax-single** further keeps just one representative per
//!   minimum-maximum class, unwinding the search past each solution it
//!   reports.
//!
//! The `demos` directory contains small example programs: `langford_pairs`
//! enumerates Langford pairings through the plain exact cover interface,
//! and `graceful` searches for graceful graph labelings with color
//! controls doing the bookkeeping.
//!
//! # Examples
//!
//! Knuth poses this toy problem at the beginning of Section 7.2.2.1 in
//! [_TAOCP_ **4B**][taocp4b], Part 2, page 66: cover the primary items
//! $a,b,c,d,e,f,g$ using some of the options
//! \\[
//! \`c\\;e';\quad\`a\\;d\\;g';\quad\`b\\;c\\;f';\quad\`a\\;d\\;f';\quad\`b\\;g';\quad\`d\\;e\\;g'.
//! \\]
//! The unique solution is $\`a\\;d\\;f';\\;\`b\\;g';\\;\`c\\;e'$:
//!
//! ```
//! use std::ops::ControlFlow;
//! use color_covers::Solver;
//!
//! let items = ["a", "b", "c", "d", "e", "f", "g"];
//! let mut solver = Solver::new(&items, &[])?;
//! solver.add_option([          "c",      "e"         ])?;
//! solver.add_option(["a",           "d",          "g"])?;
//! solver.add_option([     "b", "c",           "f"    ])?;
//! solver.add_option(["a",           "d",      "f"    ])?;
//! solver.add_option([     "b",                    "g"])?;
//! solver.add_option([               "d", "e",     "g"])?;
//!
//! // The reconstruction of each option goes through a caller-provided
//! // buffer, so visiting a solution allocates next to nothing.
//! let mut option = Vec::new();
//! let mut count = 0;
//! solver.solve(|mut solution| {
//!     assert_eq!(solution.option_count(), 3);
//!     assert!(solution.next(&mut option));
//!     assert_eq!(option, [("a", None), ("d", None), ("f", None)]);
//!     assert!(solution.next(&mut option));
//!     assert_eq!(option, [("b", None), ("g", None)]);
//!     assert!(solution.next(&mut option));
//!     assert_eq!(option, [("c", None), ("e", None)]);
//!     count += 1;
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(count, 1);
//! # Ok::<(), color_covers::Error>(())
//! ```
//!
//! Color controls enter the picture with secondary items. Here $x$ and $y$
//! may be covered more than once, provided every covering assigns the same
//! color (this is exercise 7.2.2.1–49 of [_TAOCP_ **4B**][taocp4b]):
//!
//! ```
//! use std::ops::ControlFlow;
//! use color_covers::Solver;
//!
//! let primary = ["p", "q", "r"];
//! let secondary = ["x", "y"];
//! let mut solver = Solver::new(&primary, &secondary)?;
//! solver.add_option(["p", "q", "x", "y:A"])?;
//! solver.add_option(["p", "r", "x:A", "y"])?;
//! solver.add_option(["p", "x:B"])?;
//! solver.add_option(["q", "x:A"])?;
//! solver.add_option(["r", "y:B"])?;
//!
//! let mut option = Vec::new();
//! let mut count = 0;
//! solver.solve(|mut solution| {
//!     // The unique solution covers x twice with color A, and y once
//!     // without a color of its own.
//!     assert!(solution.next(&mut option));
//!     assert_eq!(option, [("q", None), ("x", Some("A"))]);
//!     assert!(solution.next(&mut option));
//!     assert_eq!(
//!         option,
//!         [("p", None), ("r", None), ("x", Some("A")), ("y", None)],
//!     );
//!     assert!(!solution.next(&mut option));
//!     count += 1;
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(count, 1);
//! # Ok::<(), color_covers::Error>(())
//! ```
//!
//! [dl]: https://arxiv.org/pdf/cs/0011047.pdf
//! [taocp4b]: https://www-cs-faculty.stanford.edu/~knuth/taocp.html#vol4
//! [`ControlFlow`]: std::ops::ControlFlow

mod error;
mod stats;
mod table;
mod xcc;

pub use error::Error;
pub use stats::SearchStats;
pub use xcc::{Config, Solution, Solver, Status};
