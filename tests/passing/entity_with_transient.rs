use multitable::{Entity, Identity, Predicate, Value};
use serde::{Deserialize, Serialize};

#[derive(Entity, Serialize, Deserialize, Clone, Debug)]
pub struct Course {
    #[serde(rename = "_id")]
    #[pk]
    pub id: Identity,
    pub title: String,
    pub credits: u32,
    pub elective: bool,
    pub room: Option<String>,
    #[transient]
    #[serde(skip)]
    pub enrolled: Vec<Identity>,
}

fn main() {
    let course = Course {
        id: Identity::from("Algebra"),
        title: "Linear Algebra".to_string(),
        credits: 6,
        elective: false,
        room: None,
        enrolled: vec![Identity::from("John Smith")],
    };
    assert_eq!(course.value_of("title"), Some(Value::from("Linear Algebra")));
    assert_eq!(course.value_of("credits"), Some(Value::Int(6)));
    assert_eq!(course.value_of("elective"), Some(Value::Bool(false)));
    assert_eq!(course.value_of("room"), Some(Value::Null));
    assert_eq!(course.value_of("enrolled"), None);
    assert!(Predicate::<Course>::gte("credits", 5).matches(&course));
}
