use crate::models::{CreateTestimonial, SchoolStats};
use crate::Store;

const TESTIMONIALS: [(&str, &str, &str, &str); 6] = [
    (
        "EduManage has completely transformed how we handle student records and parent communication. The time savings have been incredible, and parents love the real-time updates.",
        "Sarah Johnson",
        "Principal",
        "Greenwood Elementary",
    ),
    (
        "The attendance tracking feature alone has saved us 10 hours per week. The automated parent notifications have significantly improved our attendance rates.",
        "Michael Chen",
        "Vice Principal",
        "Lincoln High School",
    ),
    (
        "As a teacher, I love how easy it is to manage assignments and grades. The analytics help me identify students who need extra support early in the semester.",
        "Emily Rodriguez",
        "Math Teacher",
        "Roosevelt Middle School",
    ),
    (
        "The exam management system streamlined our entire testing process. From scheduling to result publication, everything is now automated and error-free.",
        "David Thompson",
        "Academic Director",
        "Westfield Academy",
    ),
    (
        "Parent-teacher communication has never been easier. The secure messaging platform keeps everyone connected and informed about student progress.",
        "Lisa Park",
        "Guidance Counselor",
        "Maplewood Elementary",
    ),
    (
        "The data security features give us complete peace of mind. We can focus on education while knowing our student data is completely protected.",
        "Robert Martinez",
        "IT Administrator",
        "Central High School",
    ),
];

impl Store {
    /// A store pre-filled with the landing page testimonials and default stats.
    pub fn seeded() -> Self {
        let testimonials = TESTIMONIALS
            .iter()
            .map(|(text, author, role, school)| {
                CreateTestimonial {
                    text: text.to_string(),
                    author: author.to_string(),
                    role: role.to_string(),
                    school: school.to_string(),
                    rating: 5,
                }
                .into_testimonial()
            })
            .collect();
        Store {
            testimonials,
            stats: Some(SchoolStats::default()),
            ..Store::default()
        }
    }
}
