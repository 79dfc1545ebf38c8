//! Construction of the four-linked tables that drive the search.
//!
//! All working memory is a handful of integer arrays over a single address
//! space, following the layout of Knuth's Algorithm 7.2.2.1C:
//!
//! - positions `1..=n` hold the item headers, primaries first; position `0`
//!   is the head of the circular list of active primary items, and position
//!   `n + 1` the head of the secondary list;
//! - positions `n + 2` onward hold one *node* per (option, item) occurrence,
//!   interleaved with *spacer* slots: one before the first option and one
//!   after each option.
//!
//! The arrays are allocated while the problem is declared and never resized
//! afterwards; the search mutates links strictly in place.

use std::collections::HashSet;

use crate::error::Error;

/// The sparse-matrix representation of an XCC problem.
///
/// A node is threaded into two cyclic doubly linked lists: the *vertical*
/// list of all active nodes for its item (through `ulink`/`dlink`, with the
/// item header as sentinel), and, implicitly through index adjacency and
/// the spacer links, the ring of nodes of its option. Given any node, the
/// rest of its option can be visited by walking to the right and wrapping
/// at the trailing spacer via `ulink`, or to the left and wrapping at the
/// leading spacer via `dlink`. No per-option metadata is stored.
pub(crate) struct Table<'i> {
    /// Number of primary items.
    pub(crate) n1: usize,
    /// Total number of items, primary and secondary.
    pub(crate) n: usize,
    /// Number of options added so far.
    pub(crate) option_count: usize,
    /// Name of each item, at positions `1..=n`. The two list heads carry
    /// no name.
    pub(crate) name: Vec<&'i str>,
    /// Left link in the horizontal list of active item headers.
    pub(crate) llink: Vec<usize>,
    /// Right link in the horizontal list of active item headers.
    pub(crate) rlink: Vec<usize>,
    /// For a node, the header of the item it instantiates (always positive);
    /// for a spacer, a non-positive serial number. In the header region this
    /// array doubles as `llen`, the length of each item's vertical list.
    pub(crate) top: Vec<isize>,
    /// Up link of the vertical lists. For the spacer after an option it
    /// points at the option's first node instead.
    pub(crate) ulink: Vec<usize>,
    /// Down link of the vertical lists. For the spacer before an option it
    /// points at the option's last node instead.
    pub(crate) dlink: Vec<usize>,
    /// Color control of each node: `0` when uncolored, a positive index
    /// into `colors` otherwise. During the search, `-1` marks a node whose
    /// color has been absorbed by purification, and the header region is
    /// scratch storage for the purified color of each secondary item.
    pub(crate) color: Vec<isize>,
    /// Color names, interned at first sighting. Ids are 1-based; the entry
    /// at index 0 is never referenced.
    pub(crate) colors: Vec<&'i str>,
    /// Position of the most recently written spacer.
    last_spacer: usize,
}

impl<'i> Table<'i> {
    /// Builds the item tables for the given primary and secondary items.
    ///
    /// The returned table has no options yet; see [`Self::add_option`].
    pub(crate) fn new(primary: &'i [&'i str], secondary: &'i [&'i str]) -> Result<Self, Error> {
        if primary.is_empty() {
            return Err(Error::EmptyItems);
        }
        let mut seen = HashSet::with_capacity(primary.len() + secondary.len());
        for &item in primary {
            if !seen.insert(item) {
                return Err(Error::DuplicatePrimary(item.to_string()));
            }
        }
        for &item in secondary {
            if !seen.insert(item) {
                return Err(Error::DuplicateSecondary(item.to_string()));
            }
        }

        let n1 = primary.len();
        let n = n1 + secondary.len();

        let mut name = Vec::with_capacity(n + 2);
        name.push("");
        name.extend_from_slice(primary);
        name.extend_from_slice(secondary);
        name.push("");

        let mut llink = vec![0; n + 2];
        let mut rlink = vec![0; n + 2];
        for i in 1..=n {
            llink[i] = i - 1;
            rlink[i - 1] = i;
        }
        // Split the chain into two circular lists: primary items through the
        // sentinel at 0, secondary items through the sentinel at n + 1.
        llink[n + 1] = n;
        rlink[n] = n + 1;
        llink[n1 + 1] = n + 1;
        rlink[n + 1] = n1 + 1;
        llink[0] = n1;
        rlink[n1] = 0;

        // Empty vertical list for every item, and the spacer that precedes
        // the first option.
        let mut top = vec![0; n + 2];
        let mut ulink = vec![0; n + 2];
        let mut dlink = vec![0; n + 2];
        for i in 1..=n {
            top[i] = 0;
            ulink[i] = i;
            dlink[i] = i;
        }

        Ok(Self {
            n1,
            n,
            option_count: 0,
            name,
            llink,
            rlink,
            top,
            ulink,
            dlink,
            color: vec![0; n + 2],
            colors: vec![""],
            last_spacer: n + 1,
        })
    }

    /// Appends one option, given as item references of the form `name` or
    /// `name:color`.
    ///
    /// Nodes go to the tail of each item's vertical list, so the search
    /// tries options in insertion order.
    ///
    /// # Panics
    ///
    /// This function panics if the option is empty. Coloring a primary item
    /// and repeating an item within one option violate the input contract;
    /// both are caught in debug builds only.
    pub(crate) fn add_option(&mut self, tokens: &[&'i str]) -> Result<(), Error> {
        assert!(!tokens.is_empty(), "option must have at least one item");
        // Resolve every token before touching the tables, so that a
        // malformed option leaves the problem untouched.
        let mut refs = Vec::with_capacity(tokens.len());
        for &token in tokens {
            let (item, color_name) = match token.split_once(':') {
                Some((item, color_name)) => (item, Some(color_name)),
                None => (token, None),
            };
            let i = (1..=self.n).find(|&i| self.name[i] == item).ok_or_else(|| {
                Error::UnknownItemInOption {
                    option: self.option_count,
                    token: token.to_string(),
                }
            })?;
            debug_assert!(
                color_name.is_none() || i > self.n1,
                "color assigned to primary item `{item}`"
            );
            debug_assert!(
                !refs.iter().any(|&(j, _)| j == i),
                "item `{item}` appears more than once in the option"
            );
            refs.push((i, color_name));
        }

        let first = self.top.len();
        for (i, color_name) in refs {
            let x = self.top.len();
            let c = color_name.map_or(0, |name| self.intern_color(name));
            self.top.push(i as isize);
            self.color.push(c);
            // Link the node below the current tail of i's vertical list.
            let tail = self.ulink[i];
            self.dlink[tail] = x;
            self.ulink.push(tail);
            self.dlink.push(i);
            self.ulink[i] = x;
            self.top[i] += 1; // llen
        }
        // Close the option with a spacer: the previous spacer's down link
        // leads to this option's last node, and the new spacer's up link
        // back to its first.
        let last = self.top.len() - 1;
        self.dlink[self.last_spacer] = last;
        let spacer = self.top.len();
        self.option_count += 1;
        self.top.push(-(self.option_count as isize));
        self.color.push(0);
        self.ulink.push(first);
        self.dlink.push(0);
        self.last_spacer = spacer;
        Ok(())
    }

    /// Returns the id of the given color name, assigning the next free id
    /// at its first sighting.
    fn intern_color(&mut self, name: &'i str) -> isize {
        match self.colors.iter().skip(1).position(|&c| c == name) {
            Some(ix) => ix as isize + 1,
            None => {
                self.colors.push(name);
                (self.colors.len() - 1) as isize
            }
        }
    }

    /// Total length of the node region arrays.
    pub(crate) fn size(&self) -> usize {
        self.top.len()
    }

    /// Length of item `i`'s vertical list.
    pub(crate) fn llen(&self, i: usize) -> usize {
        self.top[i] as usize
    }

    /// Returns the first node of the option containing node `p`.
    pub(crate) fn first_of_option(&self, mut p: usize) -> usize {
        while self.top[p - 1] > 0 {
            p -= 1;
        }
        p
    }

    /// Returns the spacer that closes the option containing node `p`.
    pub(crate) fn trailing_spacer(&self, mut p: usize) -> usize {
        while self.top[p] > 0 {
            p += 1;
        }
        p
    }
}
