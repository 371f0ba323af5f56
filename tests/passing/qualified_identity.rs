mod school {
    #[derive(multitable::Entity)]
    pub struct Teacher {
        #[pk]
        pub name: multitable::Identity,
        pub subject: String,
    }
}

use multitable::Entity;

fn main() {
    let mut teacher = school::Teacher { name: "Jane Doe".into(), subject: "History".to_string() };
    *teacher.id_mut() = multitable::Identity::from("Jane Doe");
    assert_eq!(teacher.value_of("name"), None);
    assert_eq!(<school::Teacher as Entity>::TABLE, "Teacher");
    assert_eq!(teacher.value_of("subject"), Some(multitable::Value::from("History")));
    let scope = multitable::TableScope::of::<school::Teacher>().unwrap();
    assert_eq!(scope.upper_bound(), "Teacher}");
}
