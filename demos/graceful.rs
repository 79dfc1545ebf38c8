//! This program finds the graceful labelings of a small undirected graph.
//!
//! A labeling of the vertices of a graph with $m$ edges by distinct numbers
//! in $\\{0,\dots,m\\}$ is _graceful_ if the $m$ absolute differences along
//! the edges are exactly $1,\dots,m$. The XCC formulation comes from
//! exercise 7.2.2.3–69 of _The Art of Computer Programming_: edge labels and
//! edges are primary items, while vertices and label "holders" are secondary
//! items whose colors pin down a consistent assignment. A vertex is colored
//! by its label, and a holder by the one vertex allowed to claim that label.

use std::ops::ControlFlow;

use color_covers::Solver;

/// The edges of the graph under study, here the path 0-1-2-3.
const EDGES: [(usize, usize); 3] = [(0, 1), (1, 2), (2, 3)];
const VERTICES: usize = 4;

fn main() {
    let m = EDGES.len();

    let diff_names: Vec<String> = (1..=m).map(|d| format!("d{d}")).collect();
    let edge_names: Vec<String> = EDGES.iter().map(|(u, v)| format!("e{u}-{v}")).collect();
    let vertex_names: Vec<String> = (0..VERTICES).map(|u| format!("v{u}")).collect();
    let holder_names: Vec<String> = (0..=m).map(|j| format!("h{j}")).collect();

    let primary: Vec<&str> = diff_names
        .iter()
        .chain(&edge_names)
        .map(String::as_str)
        .collect();
    let secondary: Vec<&str> = vertex_names
        .iter()
        .chain(&holder_names)
        .map(String::as_str)
        .collect();

    // One option per way of realizing edge difference d on edge (u, v):
    // label one endpoint j and the other k = j + d, in either orientation.
    let mut options: Vec<Vec<String>> = Vec::new();
    for d in 1..=m {
        for (e, &(u, v)) in EDGES.iter().enumerate() {
            for j in 0..=m - d {
                let k = j + d;
                for (x, y) in [(u, v), (v, u)] {
                    options.push(vec![
                        diff_names[d - 1].clone(),
                        edge_names[e].clone(),
                        format!("v{x}:{j}"),
                        format!("v{y}:{k}"),
                        format!("h{j}:{x}"),
                        format!("h{k}:{y}"),
                    ]);
                }
            }
        }
    }

    let mut solver = Solver::new(&primary, &secondary).expect("the item lists are valid");
    for option in &options {
        let tokens: Vec<&str> = option.iter().map(String::as_str).collect();
        solver
            .add_option(tokens)
            .expect("every option references declared items");
    }

    let mut count = 0usize;
    let mut option = Vec::new();
    solver.solve(|mut solution| {
        let mut labeling = vec![0usize; VERTICES];
        while solution.next(&mut option) {
            for &(name, color) in &option {
                if let (Some(vertex), Some(label)) = (name.strip_prefix('v'), color) {
                    if let (Ok(vertex), Ok(label)) = (vertex.parse::<usize>(), label.parse()) {
                        labeling[vertex] = label;
                    }
                }
            }
        }
        println!("{labeling:?}");
        count += 1;
        ControlFlow::Continue(())
    });
    println!("{count} graceful labelings of the path on {VERTICES} vertices");
}
