//! Friends-of-friends on a small 2D dataset, with both engines.

use fof::{Engine, FriendsOfFriends, PointSet, Threshold};

fn main() {
    // Three well-separated clumps and one straggler.
    let points = PointSet::from_rows(&[
        // Clump A (near origin)
        [0.0, 0.0],
        [0.1, 0.2],
        [0.2, 0.1],
        [-0.1, 0.1],
        // Clump B (near (5, 5)), a chain along x
        [5.0, 5.0],
        [5.5, 5.0],
        [6.0, 5.0],
        [6.5, 5.0],
        // Clump C (near (10, 0))
        [10.0, 0.0],
        [10.1, 0.1],
        [9.9, -0.1],
        // Straggler
        [20.0, 20.0],
    ])
    .unwrap();

    for engine in [Engine::Indexed, Engine::Brute] {
        let groups = FriendsOfFriends::new(0.5)
            .with_engine(engine)
            .fit(&points)
            .unwrap();
        println!("=== {engine:?} (linking length 0.5) ===");
        for (id, group) in groups.iter().enumerate() {
            println!("  group {id}: {group:?}");
        }
    }

    // The chain in clump B is spaced exactly at the linking length.
    let groups = FriendsOfFriends::new(0.5)
        .with_threshold(Threshold::Exclusive)
        .fit(&points)
        .unwrap();
    println!("\n=== Exclusive threshold ===");
    println!("  {} groups, sizes {:?}", groups.len(), groups.sizes());
}
