use fof::{friends_of_friends, Engine, ErrorKind, FriendsOfFriends, PointSet};
use rand::prelude::*;
use rand_distr::Normal;

fn sorted(mut groups: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    for g in &mut groups {
        g.sort_unstable();
    }
    groups.sort_unstable();
    groups
}

fn axis_pair<T: Copy + Default + From<u8>>(dim: usize) -> Vec<Vec<T>> {
    let mut a = vec![T::default(); dim];
    let mut b = vec![T::default(); dim];
    a[0] = T::from(0);
    b[0] = T::from(1);
    vec![a, b]
}

#[test]
fn two_points_separated_on_x_axis() {
    for dim in 1..10 {
        let floats = axis_pair::<f64>(dim);
        let ints = axis_pair::<i32>(dim);
        for use_brute in [false, true] {
            for (ll, expected) in [
                (0.5, vec![vec![0], vec![1]]),
                (0.999, vec![vec![0], vec![1]]),
                (1.001, vec![vec![0, 1]]),
                (2.0, vec![vec![0, 1]]),
            ] {
                let got = sorted(friends_of_friends(&floats, ll, use_brute).unwrap());
                assert_eq!(got, expected, "f64 dim {dim} ll {ll} brute {use_brute}");
                let got = sorted(friends_of_friends(&ints, ll, use_brute).unwrap());
                assert_eq!(got, expected, "i32 dim {dim} ll {ll} brute {use_brute}");
            }
        }
    }
}

#[test]
fn exact_linking_length_is_inclusive() {
    for dim in 1..10 {
        let points = axis_pair::<f64>(dim);
        assert_eq!(friends_of_friends(&points, 1.0, false).unwrap(), vec![vec![0, 1]]);
        assert_eq!(sorted(friends_of_friends(&points, 1.0, true).unwrap()), vec![vec![0, 1]]);
    }
}

#[test]
fn points_passed_as_nested_lists() {
    let points = vec![vec![0.0, 0.0], vec![0.0, 0.5]];
    assert_eq!(
        sorted(friends_of_friends(&points, 0.4, false).unwrap()),
        vec![vec![0], vec![1]]
    );
}

#[test]
fn brute_force_engine_explicitly() {
    let points = [[0, 1], [0, 0]];
    assert_eq!(
        sorted(friends_of_friends(&points, 0.5, true).unwrap()),
        vec![vec![0], vec![1]]
    );
}

#[test]
fn no_points() {
    let points: Vec<[f64; 2]> = Vec::new();
    assert!(friends_of_friends(&points, 1.0, false).unwrap().is_empty());
    assert!(friends_of_friends(&points, 1.0, true).unwrap().is_empty());
}

#[test]
fn malformed_input_is_rejected_before_clustering() {
    let ragged = vec![vec![0.0, 0.0], vec![1.0, 0.0, 0.0]];
    let err = friends_of_friends(&ragged, 1.0, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let no_columns: Vec<Vec<f64>> = vec![vec![]];
    let err = friends_of_friends(&no_columns, 1.0, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = PointSet::read_text("0 0\n1 x\n".as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

fn gaussian_blobs(points_per_blob: usize, seed: u64) -> PointSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let left = Normal::new(-1.0, 0.2).unwrap();
    let right = Normal::new(1.0, 0.2).unwrap();

    let mut coords = Vec::with_capacity(points_per_blob * 4);
    for _ in 0..points_per_blob {
        coords.push(left.sample(&mut rng));
        coords.push(left.sample(&mut rng));
    }
    for _ in 0..points_per_blob {
        coords.push(right.sample(&mut rng));
        coords.push(right.sample(&mut rng));
    }
    PointSet::from_flat(&coords, 2).unwrap()
}

fn assert_two_blobs(points: &PointSet, points_per_blob: usize, engine: Engine) {
    let groups = FriendsOfFriends::new(0.4)
        .with_engine(engine)
        .fit(points)
        .unwrap();
    assert_eq!(groups.len(), 2, "{engine:?}");
    assert_eq!(groups.sizes(), vec![points_per_blob, points_per_blob]);

    let labels = groups.labels();
    assert!(labels[..points_per_blob].iter().all(|&l| l == labels[0]));
    assert!(labels[points_per_blob..]
        .iter()
        .all(|&l| l == labels[points_per_blob]));
}

#[test]
fn two_gaussian_blobs_indexed() {
    let points = gaussian_blobs(10_000, 42);
    assert_two_blobs(&points, 10_000, Engine::Indexed);
}

#[test]
fn two_gaussian_blobs_both_engines_small() {
    let points = gaussian_blobs(2_000, 7);
    assert_two_blobs(&points, 2_000, Engine::Indexed);
    assert_two_blobs(&points, 2_000, Engine::Brute);
}

#[test]
#[cfg_attr(debug_assertions, ignore = "all-pairs scan of 20k points is slow unoptimized")]
fn two_gaussian_blobs_brute() {
    let points = gaussian_blobs(10_000, 42);
    assert_two_blobs(&points, 10_000, Engine::Brute);
}
