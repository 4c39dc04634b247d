use std::collections::BTreeMap;

use worldmap::{
    Direction, Edge, GridBounds, GridPos, LayoutConfig, Location, LocationId, NormPos, WorldMap,
    classify, layout_world, normalize, place, visible_edges,
};

fn id(raw: &str) -> LocationId {
    LocationId::from(raw)
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!((actual - expected).abs() < 1e-12, "{what}: expected {expected}, got {actual}");
}

#[test]
fn empty_graph_places_nothing() {
    assert_eq!(place(&[]), BTreeMap::new());

    let layout = layout_world(&[], &LayoutConfig::default());
    assert!(layout.grid.is_empty());
    assert!(layout.normalized.is_empty());
    assert_eq!(layout.bounds, None);
    assert!(layout.edges.is_empty());
}

#[test]
fn single_unplaced_location_sits_in_the_centre() {
    let layout = layout_world(&[Location::new("lonely")], &LayoutConfig::default());

    assert_eq!(layout.grid[&id("lonely")], GridPos::new(0, 0));
    assert_eq!(layout.normalized[&id("lonely")], NormPos { x: 0.5, y: 0.5 });
}

#[test]
fn east_exit_spreads_across_the_padded_x_axis() {
    let locations =
        vec![Location::new("a").at(0, 0).with_exit("b", Direction::East), Location::new("b")];

    let grid = place(&locations);
    assert_eq!(grid[&id("a")], GridPos::new(0, 0));
    assert_eq!(grid[&id("b")], GridPos::new(1, 0));

    let (normalized, bounds) = normalize(&grid, 0.15);
    assert_eq!(bounds, Some(GridBounds { min_x: 0, max_x: 1, min_y: 0, max_y: 0 }));
    assert_close(normalized[&id("a")].x, 0.15, "a.x");
    assert_close(normalized[&id("b")].x, 0.85, "b.x");
    assert_eq!(normalized[&id("a")].y, 0.5);
    assert_eq!(normalized[&id("b")].y, 0.5);
}

#[test]
fn collision_with_stored_cell_resolves_to_first_ring_cell() {
    let locations = vec![
        Location::new("a").at(0, 0).with_exit("b", Direction::East),
        Location::new("b"),
        Location::new("c").at(1, 0),
    ];

    let grid = place(&locations);
    assert_eq!(grid[&id("a")], GridPos::new(0, 0));
    assert_eq!(grid[&id("c")], GridPos::new(1, 0));
    assert_eq!(grid[&id("b")], GridPos::new(1, -1));
}

#[test]
fn north_exit_places_target_one_row_up() {
    let locations = vec![
        Location::new("gate").with_exit("keep", Direction::North),
        Location::new("keep").with_exit("gate", Direction::South),
    ];

    let grid = place(&locations);
    assert_eq!(grid[&id("keep")], GridPos::new(grid[&id("gate")].x, grid[&id("gate")].y - 1));
}

#[test]
fn reciprocal_exits_collapse_to_one_two_way_edge() {
    let locations = vec![
        Location::new("a").with_exit("b", Direction::North),
        Location::new("b").with_exit("a", Direction::South),
    ];

    assert_eq!(classify(&locations), vec![Edge { from: id("a"), to: id("b"), is_two_way: true }]);
}

#[test]
fn one_way_edge_visibility_follows_focus() {
    let locations = vec![Location::new("a").with_exit("b", Direction::Down), Location::new("b")];
    let edges = classify(&locations);

    assert!(visible_edges(&edges, None).is_empty());
    assert_eq!(visible_edges(&edges, Some(&id("a"))).len(), 1);
    assert_eq!(visible_edges(&edges, Some(&id("b"))).len(), 1);
    assert!(visible_edges(&edges, Some(&id("elsewhere"))).is_empty());
}

#[test]
fn portal_network_spreads_without_overlap() {
    let locations = vec![
        Location::new("hub")
            .with_exit("fire", Direction::Enter)
            .with_exit("ice", Direction::Enter)
            .with_exit("void", Direction::Unknown),
        Location::new("fire").with_exit("hub", Direction::Enter),
        Location::new("ice").with_exit("hub", Direction::Enter),
        Location::new("void"),
    ];

    let layout = layout_world(&locations, &LayoutConfig::default());
    assert_eq!(layout.grid[&id("fire")], GridPos::new(0, -1));
    assert_eq!(layout.grid[&id("ice")], GridPos::new(0, 1));
    assert_eq!(layout.grid[&id("void")], GridPos::new(-1, 0));
    assert_eq!(layout.visible_edges(None).len(), 2);
}

#[test]
fn adjacent_markers_in_a_tiny_viewport_draw_no_connector() {
    let mut config = LayoutConfig::default();
    config.viewport.width = 20.0;
    config.viewport.height = 20.0;
    let locations = vec![
        Location::new("a").with_exit("b", Direction::East),
        Location::new("b").with_exit("a", Direction::West),
    ];

    let world = WorldMap::new(config);
    let layout = world.layout(&locations);
    assert_eq!(layout.visible_edges(None).len(), 1);
    assert!(world.connection_paths(&layout, &locations, None).is_empty());
}

#[test]
fn extreme_stored_coordinates_never_overflow() {
    let locations = vec![
        Location::new("rim").at(i32::MAX, 0).with_exit("past", Direction::East),
        Location::new("past"),
    ];
    let grid = place(&locations);
    assert_eq!(grid[&id("rim")], GridPos::new(i32::MAX, 0));
    assert_eq!(grid[&id("past")], GridPos::new(i32::MAX, -1));

    let locations = vec![
        Location::new("west").at(i32::MIN, 0).with_exit("east", Direction::East),
        Location::new("east").at(i32::MAX, 0).with_exit("west", Direction::West),
    ];
    let world = WorldMap::new(LayoutConfig::default());
    let layout = world.layout(&locations);
    assert_close(layout.normalized[&id("west")].x, 0.15, "west.x");
    assert_close(layout.normalized[&id("east")].x, 0.85, "east.x");
    assert_eq!(layout.normalized[&id("west")].y, 0.5);
    assert_eq!(world.connection_paths(&layout, &locations, None).len(), 1);
}
