//! Tree ownership and transform derivation through the public API

use approx::assert_relative_eq;
use stage_engine::display::{layers, Compose, Container, DisplayList, Group, Sprite};
use stage_engine::foundation::collections::Handle;
use stage_engine::foundation::math::Vec2;

fn container(list: &mut DisplayList, x: f32, y: f32) -> Handle<Container> {
    list.spawn(Container::new(Group::new(x, y)))
}

#[test]
fn adding_twice_keeps_one_entry() {
    let mut list = DisplayList::new();
    let parent = container(&mut list, 0.0, 0.0);
    let sprite = list.insert(Sprite::new(0.0, 0.0, "a"));

    list.graph_mut().add_child(parent, sprite);
    list.graph_mut().add_child(parent, sprite);

    assert_eq!(list.graph().children(parent), &[sprite.id()]);
}

#[test]
fn removing_a_non_member_changes_nothing() {
    let mut list = DisplayList::new();
    let parent = container(&mut list, 0.0, 0.0);
    let member = list.insert(Sprite::new(0.0, 0.0, "a"));
    let stranger = list.insert(Sprite::new(0.0, 0.0, "b"));
    list.graph_mut().add_child(parent, member);

    list.graph_mut().remove_child(parent, stranger);
    list.graph_mut().remove_child(parent, stranger);

    assert_eq!(list.graph().children(parent), &[member.id()]);
}

#[test]
fn adding_to_another_container_moves_the_child() {
    let mut list = DisplayList::new();
    let a = container(&mut list, 0.0, 0.0);
    let b = container(&mut list, 0.0, 0.0);
    let x = list.insert(Sprite::new(0.0, 0.0, "x"));
    list.graph_mut().add_child(a, x);

    list.graph_mut().add_child(b, x);

    let graph = list.graph();
    assert!(!graph.has_child(a, x));
    assert!(graph.has_child(b, x));
    assert_eq!(graph.parent_of(x), Some(b.id()));
}

#[test]
fn no_container_is_reachable_from_itself() {
    let mut list = DisplayList::new();
    let outer = container(&mut list, 0.0, 0.0);
    let middle = list.insert(Container::new(Group::new(0.0, 0.0)));
    let inner = list.insert(Container::new(Group::new(0.0, 0.0)));
    list.graph_mut().add_child(outer, middle);
    list.graph_mut().add_child(middle, inner);

    let graph = list.graph();
    for id in [outer.id(), middle.id(), inner.id()] {
        // descendants() lists the root first
        assert!(!graph.descendants(id)[1..].contains(&id));
    }
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "cycle")]
fn parenting_an_ancestor_panics_in_debug() {
    let mut list = DisplayList::new();
    let outer = container(&mut list, 0.0, 0.0);
    let inner = list.insert(Container::new(Group::new(0.0, 0.0)));
    list.graph_mut().add_child(outer, inner);

    list.graph_mut().add_child(inner, outer);
}

#[cfg(not(debug_assertions))]
#[test]
fn parenting_an_ancestor_is_rejected_in_release() {
    let mut list = DisplayList::new();
    let outer = container(&mut list, 0.0, 0.0);
    let inner = list.insert(Container::new(Group::new(0.0, 0.0)));
    list.graph_mut().add_child(outer, inner);

    list.graph_mut().add_child(inner, outer);

    assert!(list.graph().children(inner).is_empty());
    assert_eq!(list.graph().parent_of(outer), Some(list.root().id()));
}

#[test]
fn world_position_composes_through_three_levels() {
    let mut list = DisplayList::new();
    list.begin_frame(1);
    let parent = container(&mut list, 100.0, 100.0);
    let x = list.insert(Sprite::new(10.0, 0.0, "x"));
    list.graph_mut().add_child(parent, x);

    assert_relative_eq!(list.graph_mut().world_position(x).unwrap(), Vec2::new(110.0, 100.0));

    let grandparent = container(&mut list, 5.0, 5.0);
    list.graph_mut().add_child(grandparent, parent);

    assert_relative_eq!(list.graph_mut().world_position(x).unwrap(), Vec2::new(115.0, 105.0));
}

#[test]
fn ancestor_move_is_seen_and_siblings_are_not_recomputed() {
    let mut list = DisplayList::new();
    list.begin_frame(1);
    let parent = container(&mut list, 100.0, 100.0);
    let x = list.insert(Sprite::new(10.0, 0.0, "x"));
    list.graph_mut().add_child(parent, x);
    let sibling = list.spawn(Sprite::new(50.0, 50.0, "s"));

    list.graph_mut().world_position(x);
    list.graph_mut().world_position(sibling);

    list.begin_frame(2);
    list.graph_mut().set_position(parent, 200.0, 100.0);
    assert_relative_eq!(list.graph_mut().world_position(x).unwrap(), Vec2::new(210.0, 100.0));

    let before = list.graph().recompute_count();
    assert_relative_eq!(list.graph_mut().world_position(sibling).unwrap(), Vec2::new(50.0, 50.0));
    assert_eq!(list.graph().recompute_count(), before);
}

#[test]
fn composed_container_parents_like_a_plain_one() {
    let mut list = DisplayList::new();
    list.begin_frame(1);
    let faded = list.spawn(
        Compose::new(Group::new(20.0, 0.0))
            .with(layers::parent())
            .with(layers::alpha(0.5))
            .build(),
    );
    let child = list.insert(Sprite::new(1.0, 0.0, "c"));
    list.graph_mut().add_child(faded, child);

    assert_relative_eq!(list.graph_mut().world_position(child).unwrap(), Vec2::new(21.0, 0.0));
}
