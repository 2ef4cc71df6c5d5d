#![allow(dead_code)]

use linkage::{Joint, Link, Mechanism, Topology};

/// Grashof crank-rocker: crank 1 driven at 60 deg/s, ground 3.
///
/// Joints: 1 = crank pivot (input), 2 = crank tip, 3 = coupler/rocker pin,
/// 4 = rocker pivot. Links: 10 crank, 11 coupler, 12 rocker.
pub fn crank_rocker() -> (Vec<Joint>, Vec<Link>) {
    let joints = vec![
        Joint::revolute(1, 0.0, 0.0).driven(60.0),
        Joint::revolute(2, 0.0, 1.0),
        Joint::revolute(3, 3.0, 2.5),
        Joint::revolute(4, 3.0, 0.0).grounded(),
    ];
    let links = vec![
        Link::new(10, [1, 2]),
        Link::new(11, [2, 3]),
        Link::new(12, [3, 4]),
    ];
    (joints, links)
}

/// Non-Grashof four-bar whose crank cannot turn fully.
pub fn triple_rocker() -> (Vec<Joint>, Vec<Link>) {
    let joints = vec![
        Joint::revolute(1, 0.0, 0.0).driven(60.0),
        Joint::revolute(2, 0.0, 2.0),
        Joint::revolute(3, 2.0, 2.2),
        Joint::revolute(4, 4.0, 0.0).grounded(),
    ];
    let links = vec![
        Link::new(10, [1, 2]),
        Link::new(11, [2, 3]),
        Link::new(12, [3, 4]),
    ];
    (joints, links)
}

/// Crank 1 driving a slider on the x axis through a coupler.
pub fn slider_crank() -> (Vec<Joint>, Vec<Link>) {
    let joints = vec![
        Joint::revolute(1, 0.0, 0.0).driven(60.0),
        Joint::revolute(2, 0.0, 1.0),
        Joint::prismatic(3, 3.0, 0.0, 0.0).grounded(),
    ];
    let links = vec![Link::new(10, [1, 2]), Link::new(11, [2, 3])];
    (joints, links)
}

pub fn topology((joints, links): (Vec<Joint>, Vec<Link>)) -> Topology {
    Topology::new(0, joints, &links).unwrap()
}

pub fn mechanism((joints, links): (Vec<Joint>, Vec<Link>)) -> Mechanism {
    let mut mechanism = Mechanism::new();
    for joint in joints {
        mechanism.add_joint(joint).unwrap();
    }
    for link in links {
        mechanism.add_link(link).unwrap();
    }
    mechanism
}
