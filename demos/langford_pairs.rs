//! This program finds all ways to put the $2n$ numbers $\\{1,1,2,2,\dots,n,n\\}$
//! into $2n$ slots $s_1,\dots,s_{2n}$ so that exactly $i$ numbers lie between
//! the two appearances of $i$, for all $1\leq i\leq n$. The task is known as
//! _Langford's problem_, after C. D. Langford [[_The Mathematical Gazette_ 42
//! (October 1958), 228][mathgaz]]; its encoding as an exact cover problem is
//! explained in D. E. Knuth's [_The Art of Computer Programming_ 4B
//! (2022)][taocp4b], Part 2, page 70:
//!
//! Regard the $n$ values of $i$ and the $2n$ slots as the items to be
//! covered. The legal options are $\`i\\;s_j\\;s_k'$ for $1\leq i\leq n$ and
//! $k=i+j+1\leq 2n$, so that the two appearances of $i$ end up exactly
//! $i$ places apart.
//!
//! [mathgaz]: https://www.cambridge.org/core/journals/mathematical-gazette/article/abs/problem/557F7BBB739F5B3E0D152C270642B102
//! [taocp4b]: https://www-cs-faculty.stanford.edu/~knuth/taocp.html#vol4

use std::ops::ControlFlow;

use color_covers::Solver;

/// Langford pairings exist only when $n$ is congruent to 0 or 3 modulo 4.
const N: usize = 7;

fn main() {
    let number_names: Vec<String> = (1..=N).map(|i| i.to_string()).collect();
    let slot_names: Vec<String> = (1..=2 * N).map(|j| format!("s{j}")).collect();
    let items: Vec<&str> = number_names
        .iter()
        .chain(&slot_names)
        .map(String::as_str)
        .collect();

    let mut solver = Solver::new(&items, &[]).expect("the item list is valid");
    for i in 1..=N {
        // Half of all Langford pairs are the reverses of the others; only
        // place the first 1 in the left half.
        let first_slots = 1..if i == 1 { N } else { 2 * N - i };
        for j in first_slots {
            let k = i + j + 1;
            solver
                .add_option([
                    number_names[i - 1].as_str(),
                    slot_names[j - 1].as_str(),
                    slot_names[k - 1].as_str(),
                ])
                .expect("every option references declared items");
        }
    }

    let mut count = 0usize;
    let mut option = Vec::new();
    solver.solve(|mut solution| {
        // Turn the chosen options back into a placement.
        let mut placement = vec![0usize; 2 * N];
        while solution.next(&mut option) {
            let i: usize = option[0].0.parse().expect("the number comes first");
            let j: usize = option[1].0[1..].parse().expect("then its first slot");
            let k: usize = option[2].0[1..].parse().expect("and its second slot");
            placement[j - 1] = i;
            placement[k - 1] = i;
        }
        println!("{placement:?}");
        count += 1;
        ControlFlow::Continue(())
    });
    println!("{count} Langford pairings of 2*{N} numbers, up to reversal");
}
