use multitable::*;

#[derive(Entity, Clone, Debug)]
struct Minimal {
    #[pk]
    id: Identity,
}

fn main() {
    let mut minimal = Minimal { id: Identity::from("a") };
    assert_eq!(Minimal::TABLE, "Minimal");
    assert_eq!(minimal.id().as_str(), "a");
    Minimal::scope().unwrap().prefix_entity(&mut minimal);
    assert_eq!(minimal.id().as_str(), "Minimal|a");
    assert_eq!(minimal.value_of("id"), None);
}
