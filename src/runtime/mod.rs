//! 进程生命周期：启动准备与优雅停机

pub mod lifetime;
