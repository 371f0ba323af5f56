use crate::{Student, Teacher};
use futures::future::try_join_all;
use multitable::{info, AppError, CompareOp, Field, Predicate, RedbCollection, Repository};

pub struct School {
    pub students: Repository<Student, RedbCollection>,
    pub teachers: Repository<Teacher, RedbCollection>,
}

impl School {
    pub fn new(collection: RedbCollection) -> Result<Self, AppError> {
        Ok(School { students: Repository::new(collection.clone())?, teachers: Repository::new(collection)? })
    }

    pub async fn enroll(&self, students: Vec<Student>) -> Result<Vec<Student>, AppError> {
        try_join_all(students.into_iter().map(|student| self.students.insert_or_update(student))).await
    }

    pub async fn hire(&self, teachers: Vec<Teacher>) -> Result<Vec<Teacher>, AppError> {
        try_join_all(teachers.into_iter().map(|teacher| self.teachers.insert_or_update(teacher))).await
    }
}

pub fn students() -> Vec<Student> {
    vec![Student::new("John Smith", 3.2), Student::new("Tim Smith", 2.8), Student::new("Ann Lee", 3.9)]
}

pub fn teachers() -> Vec<Teacher> {
    vec![Teacher::new("John Smith", "History"), Teacher::new("Maria Garcia", "Chemistry")]
}

pub async fn demo(collection: RedbCollection) -> Result<(), AppError> {
    let school = School::new(collection)?;

    info!("Enrolling students and hiring teachers:");
    school.enroll(students()).await?;
    school.hire(teachers()).await?;

    info!("Querying students:");
    let john = school.students.get_by_id("John Smith").await?;
    info!("get_by_id(John Smith) = {:?}", john);
    let smiths = school.students.find_where(&Predicate::ends_with(Field::Id, "Smith")).await?;
    info!("ends_with(Smith) = {} students", smiths.len());
    let late_alphabet = school.students.find_where(&Predicate::compare(Field::Id, CompareOp::Gte, "T")).await?;
    info!("id >= T = {:?}", late_alphabet.iter().map(|s| s.id.as_str()).collect::<Vec<_>>());
    let honors = school.students.find_where(&Predicate::gte("gpa", 3.5)).await?;
    info!("gpa >= 3.5 = {:?}", honors.iter().map(|s| s.id.as_str()).collect::<Vec<_>>());

    info!("Querying teachers:");
    let teacher_john = school.teachers.get_by_id("John Smith").await?;
    info!("get_by_id(John Smith) = {:?}", teacher_john);
    info!("{} teachers in total", school.teachers.get_all().await?.len());

    info!("Updating and deleting:");
    school.students.insert_or_update(Student::new("Tim Smith", 3.1)).await?;
    school.students.delete_by_id("Ann Lee").await?;
    school.students.delete_all().await?;
    school.teachers.delete_all().await?;
    Ok(())
}
