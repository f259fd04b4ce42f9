//! Blog domain shared by the store tests.

use std::collections::HashMap;

use graphstage_store::{Entity, Schema, Shared, shared};

pub struct Site {
    pub id: i64,
    pub blog: Option<Shared<Blog>>,
}

impl Entity for Site {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new("Site")
            .scalar("id")
            .singular("blog", |s| &s.blog, |s| &mut s.blog)
    }
}

pub struct Blog {
    pub name: String,
    pub author: Option<Shared<Author>>,
    pub posts: Option<Vec<Shared<Post>>>,
    pub post_by_slug: HashMap<String, Shared<Post>>,
}

impl Entity for Blog {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new("Blog")
            .scalar("name")
            .singular("author", |b| &b.author, |b| &mut b.author)
            .plural("posts", |b| &b.posts, |b| &mut b.posts)
            .keyed("post_by_slug")
    }
}

pub struct Post {
    pub title: String,
}

impl Entity for Post {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new("Post").scalar("title")
    }
}

pub struct Author {
    pub name: String,
}

impl Entity for Author {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new("Author").scalar("name")
    }
}

/// A plain list of blogs, used as a second root.
pub struct BlogList {
    pub blogs: Option<Vec<Shared<Blog>>>,
}

impl Entity for BlogList {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new("BlogList").plural("blogs", |l| &l.blogs, |l| &mut l.blogs)
    }
}

pub fn site(blog: Option<Shared<Blog>>) -> Shared<Site> {
    shared(Site { id: 0, blog })
}

pub fn blog() -> Shared<Blog> {
    shared(Blog {
        name: String::new(),
        author: None,
        posts: None,
        post_by_slug: HashMap::new(),
    })
}

pub fn blog_with_posts(posts: &[&Shared<Post>]) -> Shared<Blog> {
    let b = blog();
    b.borrow_mut().posts = Some(posts.iter().map(|p| (*p).clone()).collect());
    b
}

pub fn post(title: &str) -> Shared<Post> {
    shared(Post {
        title: title.to_string(),
    })
}

pub fn author(name: &str) -> Shared<Author> {
    shared(Author {
        name: name.to_string(),
    })
}

pub fn blog_list(blogs: &[&Shared<Blog>]) -> Shared<BlogList> {
    shared(BlogList {
        blogs: Some(blogs.iter().map(|b| (*b).clone()).collect()),
    })
}
